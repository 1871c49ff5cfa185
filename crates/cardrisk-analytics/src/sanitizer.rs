//! 가격 시계열 정제.
//!
//! 변동성/성장 계산 전에 원시 관측값을 정리합니다.
//!
//! 1. 결측/0 이하 가격 제거
//! 2. 같은 카드/같은 날짜 중복 제거 (가장 최근 기록 유지)
//! 3. 날짜 오름차순 정렬
//! 4. 이상치 표시 (평균에서 3σ 초과, 삭제하지 않음)
//! 5. 2일 초과 간격을 선형 보간으로 채움 (보간 포인트 별도 표시).
//!    [`MAX_INTERPOLATION_DAYS`]를 넘는 간격은 채우지 않고 `unfilled_gaps`로 집계

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use cardrisk_core::{CardId, DecimalExt, PricePoint};

use crate::statistics::{mean, std_dev};

/// 이상치 판정 기준 (표준편차 배수).
pub const OUTLIER_SIGMA: f64 = 3.0;
/// 이상치 판정에 필요한 최소 포인트 수.
pub const MIN_OUTLIER_POINTS: usize = 3;
/// 이 일수를 초과하는 간격은 보간합니다.
pub const MAX_GAP_DAYS: i64 = 2;
/// 보간할 최대 간격 (일). 이보다 긴 간격은 그대로 둡니다.
pub const MAX_INTERPOLATION_DAYS: i64 = 31;
/// 보간 가격 소수점 자릿수.
const INTERPOLATION_DP: u32 = 4;

/// 원시 가격 관측값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPriceObservation {
    /// 카드 식별자
    pub card_id: CardId,
    /// 관측 날짜
    pub date: NaiveDate,
    /// 가격 (결측 가능)
    #[serde(default)]
    pub price: Option<Decimal>,
    /// 기록 시각 (중복 제거 시 최신 판단 기준)
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// 정제된 가격 시계열.
///
/// `points`, `outliers`, `interpolated`는 같은 길이이며 인덱스로 대응됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedSeries {
    /// 카드 식별자
    pub card_id: CardId,
    /// 날짜 오름차순 가격 포인트 (보간 포함)
    pub points: Vec<PricePoint>,
    /// 이상치 여부
    pub outliers: Vec<bool>,
    /// 보간 여부
    pub interpolated: Vec<bool>,
    /// 결측/0 이하 가격으로 제거된 수
    pub dropped_invalid: usize,
    /// 중복으로 제거된 수
    pub duplicates_removed: usize,
    /// 보간 한도를 넘어 채우지 않은 간격 수
    #[serde(default)]
    pub unfilled_gaps: usize,
}

impl SanitizedSeries {
    fn empty(card_id: CardId) -> Self {
        Self {
            card_id,
            points: Vec::new(),
            outliers: Vec::new(),
            interpolated: Vec::new(),
            dropped_invalid: 0,
            duplicates_removed: 0,
            unfilled_gaps: 0,
        }
    }

    /// 점수 계산용 가격 포인트. `exclude_interpolated`이면 보간 포인트를 제외합니다.
    pub fn price_points(&self, exclude_interpolated: bool) -> Vec<PricePoint> {
        self.points
            .iter()
            .zip(&self.interpolated)
            .filter(|(_, interpolated)| !(exclude_interpolated && **interpolated))
            .map(|(point, _)| point.clone())
            .collect()
    }

    /// 이상치 수.
    pub fn outlier_count(&self) -> usize {
        self.outliers.iter().filter(|o| **o).count()
    }

    /// 보간 포인트 수.
    pub fn interpolated_count(&self) -> usize {
        self.interpolated.iter().filter(|i| **i).count()
    }

    /// 포인트 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 단일 카드의 원시 관측값을 정제합니다.
///
/// 다른 카드의 관측값이 섞여 있으면 첫 관측값의 카드만 사용합니다.
/// 여러 카드를 한 번에 처리하려면 [`sanitize_by_card`]를 사용하세요.
pub fn sanitize_price_series(raw: &[RawPriceObservation]) -> SanitizedSeries {
    let Some(first) = raw.first() else {
        return SanitizedSeries::empty(CardId::new(""));
    };
    let card_id = first.card_id.clone();
    let own: Vec<&RawPriceObservation> = raw.iter().filter(|o| o.card_id == card_id).collect();
    sanitize_observations(card_id, &own)
}

/// 여러 카드의 원시 관측값을 카드별로 정제합니다.
pub fn sanitize_by_card(raw: &[RawPriceObservation]) -> BTreeMap<CardId, SanitizedSeries> {
    let mut grouped: BTreeMap<CardId, Vec<&RawPriceObservation>> = BTreeMap::new();
    for observation in raw {
        grouped
            .entry(observation.card_id.clone())
            .or_default()
            .push(observation);
    }

    grouped
        .into_iter()
        .map(|(card_id, observations)| {
            let series = sanitize_observations(card_id.clone(), &observations);
            (card_id, series)
        })
        .collect()
}

/// 이미 날짜/가격 형태인 시계열을 정제합니다 (제공자 응답용).
pub fn sanitize_points(card_id: &CardId, points: &[PricePoint]) -> SanitizedSeries {
    let raw: Vec<RawPriceObservation> = points
        .iter()
        .map(|p| RawPriceObservation {
            card_id: card_id.clone(),
            date: p.date,
            price: Some(p.price),
            recorded_at: None,
        })
        .collect();
    let refs: Vec<&RawPriceObservation> = raw.iter().collect();
    sanitize_observations(card_id.clone(), &refs)
}

fn sanitize_observations(card_id: CardId, raw: &[&RawPriceObservation]) -> SanitizedSeries {
    // 1. 결측/0 이하 가격 제거
    let valid: Vec<(usize, &RawPriceObservation, Decimal)> = raw
        .iter()
        .enumerate()
        .filter_map(|(position, o)| match o.price {
            Some(price) if price.is_positive_price() => Some((position, *o, price)),
            _ => None,
        })
        .collect();
    let dropped_invalid = raw.len() - valid.len();

    // 2. 날짜별 중복 제거: recorded_at이 큰 값, 같으면 나중 입력 (None < Some)
    let mut by_date: BTreeMap<NaiveDate, (usize, Option<DateTime<Utc>>, Decimal)> =
        BTreeMap::new();
    for (position, observation, price) in &valid {
        let candidate = (*position, observation.recorded_at, *price);
        by_date
            .entry(observation.date)
            .and_modify(|kept| {
                if (candidate.1, candidate.0) >= (kept.1, kept.0) {
                    *kept = candidate;
                }
            })
            .or_insert(candidate);
    }
    let duplicates_removed = valid.len() - by_date.len();

    // 3. BTreeMap 순회로 날짜 오름차순
    let known: Vec<PricePoint> = by_date
        .into_iter()
        .map(|(date, (_, _, price))| PricePoint::new(date, price))
        .collect();

    // 4. 이상치 표시
    let known_outliers = flag_outliers(&known);

    // 5. 간격 보간
    let mut points = Vec::with_capacity(known.len());
    let mut outliers = Vec::with_capacity(known.len());
    let mut interpolated = Vec::with_capacity(known.len());
    let mut unfilled_gaps = 0;

    for (i, point) in known.iter().enumerate() {
        if let Some(prev) = i.checked_sub(1).map(|j| &known[j]) {
            match interpolate_gap(prev, point) {
                Some(filled) => {
                    for p in filled {
                        points.push(p);
                        outliers.push(false);
                        interpolated.push(true);
                    }
                }
                None => {
                    tracing::warn!(
                        card_id = %card_id,
                        from = %prev.date,
                        to = %point.date,
                        max_days = MAX_INTERPOLATION_DAYS,
                        "보간 한도 초과 간격, 채우지 않음"
                    );
                    unfilled_gaps += 1;
                }
            }
        }
        points.push(point.clone());
        outliers.push(known_outliers[i]);
        interpolated.push(false);
    }

    if dropped_invalid > 0 || duplicates_removed > 0 {
        tracing::debug!(
            card_id = %card_id,
            dropped_invalid,
            duplicates_removed,
            "가격 시계열 정제"
        );
    }

    SanitizedSeries {
        card_id,
        points,
        outliers,
        interpolated,
        dropped_invalid,
        duplicates_removed,
        unfilled_gaps,
    }
}

/// 평균에서 3σ(모집단 표준편차)를 초과하는 포인트 표시. 3개 미만이면 모두 false.
fn flag_outliers(points: &[PricePoint]) -> Vec<bool> {
    if points.len() < MIN_OUTLIER_POINTS {
        return vec![false; points.len()];
    }

    let values: Vec<f64> = points.iter().map(|p| p.price_f64()).collect();
    let (Some(avg), Some(sd)) = (mean(&values), std_dev(&values)) else {
        return vec![false; points.len()];
    };

    values
        .iter()
        .map(|v| sd > 0.0 && (v - avg).abs() > OUTLIER_SIGMA * sd)
        .collect()
}

/// 두 포인트 사이의 누락된 날짜를 선형 보간합니다.
///
/// 간격이 2일 이하이면 빈 벡터, [`MAX_INTERPOLATION_DAYS`]를 넘으면 `None`.
fn interpolate_gap(from: &PricePoint, to: &PricePoint) -> Option<Vec<PricePoint>> {
    let gap = (to.date - from.date).num_days();
    if gap <= MAX_GAP_DAYS {
        return Some(Vec::new());
    }
    if gap > MAX_INTERPOLATION_DAYS {
        return None;
    }

    let span = Decimal::from(gap);
    let delta = to.price - from.price;

    let filled = (1..gap)
        .map(|day| {
            let price = from.price + delta * Decimal::from(day) / span;
            PricePoint::new(
                from.date + Duration::days(day),
                price.round_price(INTERPOLATION_DP),
            )
        })
        .collect();
    Some(filled)
}
