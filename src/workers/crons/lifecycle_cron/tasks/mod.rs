pub mod start_due_events;
