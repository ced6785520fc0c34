pub mod live_events;
