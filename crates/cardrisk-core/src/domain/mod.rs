//! 카드 투기 점수 계산을 위한 도메인 모델.

mod card;
mod price;
mod provider;
mod score;
mod signals;

pub use card::*;
pub use price::*;
pub use provider::*;
pub use score::*;
pub use signals::*;
