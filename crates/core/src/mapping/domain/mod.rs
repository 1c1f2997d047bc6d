pub mod mute_interval;
pub mod time_span_mapper;
