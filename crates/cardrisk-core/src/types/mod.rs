//! 점수 엔진 전반에서 사용되는 공통 타입.

mod card_id;
mod decimal;

pub use card_id::*;
pub use decimal::*;
