use super::byte_str::ByteStr;
use crate::types::{LinkError, LinkResult, MetricKind};
use std::fmt::Write;

/// Represents the sample rate of a metric, the probability that a given
/// emission is actually sent to the StatsD server.
///
/// The rate is rendered on the wire with exactly two fractional digits,
/// `|@0.25`, and the aggregator is expected to divide received counts by it.
/// A rate of `1.0` (or above) is full sampling and writes no suffix at all.
const ZERO_RATE: &str = "@0.00";

#[derive(Debug, Clone, Copy)]
pub(crate) struct SampleRate {
    value: f32,
    outbuf: ByteStr<8>, // "@0.25" is five bytes, no need to allocate
}

impl SampleRate {
    pub const FULL: f32 = 1.0;

    fn new(value: f32) -> LinkResult<Self> {
        let mut outbuf = ByteStr::<8>::new();
        write!(&mut outbuf, "@{:.2}", value).map_err(|_| LinkError::InvalidInput("sample rate too wide"))?;
        // A rate that rounds to zero would make the server divide by zero
        if outbuf.as_str() == ZERO_RATE {
            return Err(LinkError::InvalidInput("sample rate rounds to 0.00"));
        }
        Ok(Self { value, outbuf })
    }

    pub fn is_full(&self) -> bool {
        self.value >= Self::FULL
    }

    pub fn is_applicable_to_metric(&self, kind: MetricKind) -> bool {
        kind.is_sampled() && !self.is_full()
    }

    pub fn as_str(&self) -> &str {
        self.outbuf.as_str()
    }

    pub fn kv_size(&self) -> usize {
        self.outbuf.len()
    }
}

impl TryFrom<f32> for SampleRate {
    type Error = LinkError;

    /// Rates above `1.0` are clamped to full sampling. Zero, negative and NaN
    /// rates can't be encoded, nor can rates that round to `0.00`.
    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        if rate > 0.0 {
            Self::new(rate.min(Self::FULL))
        } else {
            Err(LinkError::InvalidInput("sample rate must be greater than 0.0"))
        }
    }
}
