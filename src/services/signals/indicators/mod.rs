//! Technical indicator implementations.

pub mod macd;
pub mod obv;
pub mod sar;
pub mod trend;

pub use macd::{Macd, MacdSeries};
pub use obv::ObvDivergence;
pub use sar::{ParabolicSar, SarSide, SarState};
pub use trend::SmaTrend;
