use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    #[error("pixel buffer length {len} is not a multiple of 4")]
    BufferLength { len: usize },

    #[error("filter range is inverted: lo {lo} > hi {hi}")]
    FilterRange { lo: u8, hi: u8 },

    #[error("result_num must be at least 1")]
    ZeroResultNum,

    #[error("cut_time must be at least 1")]
    ZeroCutTime,

    #[error("max_leaf_num must be at least 1")]
    ZeroMaxLeafNum,

    #[error("filtering removed every pixel")]
    EmptyResult,
}
