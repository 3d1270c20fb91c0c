pub mod stats;

pub use stats::{
    decode_line, encode_record, find_stat_index, parse_relaxed_int, sanitize_name, StatRecord,
    StatsError, StatsFormat, StatsStore, DEFAULT_STATS_PATH, MAX_STAT_RECORDS,
};
