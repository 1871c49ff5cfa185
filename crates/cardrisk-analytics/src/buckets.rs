//! 임계값 구간 테이블.
//!
//! 각 하위 지표는 원시 값을 고정 임계값 테이블로 0 ~ 100 점수에 매핑합니다.
//! 테이블은 위에서부터 검사하며 처음 일치하는 구간의 점수를 사용합니다.

/// 구간 비교 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// value < threshold
    Below,
    /// value >= threshold
    AtLeast,
    /// value > threshold
    Above,
}

/// 임계값 → 점수 테이블.
#[derive(Debug, Clone, Copy)]
pub struct Buckets {
    boundary: Boundary,
    steps: &'static [(f64, f64)],
    otherwise: f64,
}

impl Buckets {
    /// `value < threshold` 구간 테이블 (임계값 오름차순).
    pub const fn below(steps: &'static [(f64, f64)], otherwise: f64) -> Self {
        Self {
            boundary: Boundary::Below,
            steps,
            otherwise,
        }
    }

    /// `value >= threshold` 구간 테이블 (임계값 내림차순).
    pub const fn at_least(steps: &'static [(f64, f64)], otherwise: f64) -> Self {
        Self {
            boundary: Boundary::AtLeast,
            steps,
            otherwise,
        }
    }

    /// `value > threshold` 구간 테이블 (임계값 내림차순).
    pub const fn above(steps: &'static [(f64, f64)], otherwise: f64) -> Self {
        Self {
            boundary: Boundary::Above,
            steps,
            otherwise,
        }
    }

    /// 값에 해당하는 점수. NaN은 마지막 구간(otherwise)으로 처리합니다.
    pub fn score(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.otherwise;
        }

        self.steps
            .iter()
            .find(|(threshold, _)| match self.boundary {
                Boundary::Below => value < *threshold,
                Boundary::AtLeast => value >= *threshold,
                Boundary::Above => value > *threshold,
            })
            .map(|(_, score)| *score)
            .unwrap_or(self.otherwise)
    }
}
