//! 세트 식별자 → 발매 연도 정적 카탈로그.
//!
//! 정확히 일치하는 항목을 먼저 찾고, 없으면 가장 긴 접두사 항목을 사용합니다.
//! (예: "sm35" → "sm" → 2017)

/// 정확히 일치해야 하는 세트 식별자.
const EXACT_SETS: &[(&str, i32)] = &[
    ("base1", 1999),
    ("base2", 1999),
    ("jungle", 1999),
    ("base3", 1999),
    ("fossil", 1999),
    ("base4", 2000),
    ("base5", 2000),
    ("team rocket", 2000),
    ("gym1", 2000),
    ("gym2", 2000),
    ("neo1", 2000),
    ("neo2", 2001),
    ("neo3", 2001),
    ("neo4", 2001),
    ("base6", 2002),
    ("ecard1", 2002),
    ("ecard2", 2003),
    ("ecard3", 2003),
    ("ex1", 2003),
    ("ex2", 2003),
    ("ex3", 2003),
    ("ex4", 2004),
    ("ex5", 2004),
    ("ex6", 2004),
    ("ex7", 2004),
    ("ex8", 2004),
    ("ex9", 2005),
    ("ex10", 2005),
    ("ex11", 2005),
    ("ex12", 2005),
    ("ex13", 2006),
    ("ex14", 2006),
    ("ex15", 2006),
    ("ex16", 2007),
    ("dp1", 2007),
    ("dp2", 2007),
    ("dp3", 2007),
    ("dp4", 2008),
    ("dp5", 2008),
    ("dp6", 2008),
    ("dp7", 2009),
    ("pl1", 2009),
    ("pl2", 2009),
    ("pl3", 2009),
    ("pl4", 2009),
    ("bw1", 2011),
    ("bw2", 2011),
    ("bw3", 2011),
    ("bw4", 2011),
    ("bw5", 2012),
    ("bw6", 2012),
    ("bw7", 2012),
    ("bw8", 2012),
    ("bw9", 2013),
    ("bw10", 2013),
    ("bw11", 2013),
    ("xy1", 2014),
    ("xy2", 2014),
    ("xy3", 2014),
    ("xy4", 2014),
    ("xy5", 2015),
    ("xy6", 2015),
    ("xy7", 2015),
    ("xy8", 2015),
    ("xy9", 2016),
    ("xy10", 2016),
    ("xy11", 2016),
    ("xy12", 2016),
    ("sm1", 2017),
    ("sm2", 2017),
    ("sm3", 2017),
    ("sm4", 2017),
    ("sm5", 2018),
    ("sm6", 2018),
    ("sm7", 2018),
    ("sm8", 2018),
    ("sm9", 2019),
    ("sm10", 2019),
    ("sm11", 2019),
    ("sm12", 2019),
    ("swsh1", 2020),
    ("swsh2", 2020),
    ("swsh3", 2020),
    ("swsh4", 2020),
    ("swsh5", 2021),
    ("swsh6", 2021),
    ("swsh7", 2021),
    ("swsh8", 2021),
    ("swsh9", 2022),
    ("swsh10", 2022),
    ("swsh11", 2022),
    ("swsh12", 2022),
    // 특별 세트 (시리즈 접두사와 연도가 다름)
    ("sm115", 2019),
    ("swsh35", 2020),
    ("swsh45", 2021),
    ("swsh45sv", 2021),
    ("cel25", 2021),
    ("pgo", 2022),
    ("swsh12pt5", 2023),
    ("swsh12pt5gg", 2023),
    ("sv3pt5", 2023),
    ("sv4pt5", 2024),
    ("sv6pt5", 2024),
    ("sv8pt5", 2025),
    ("sv1", 2023),
    ("sv2", 2023),
    ("sv3", 2023),
    ("sv4", 2023),
    ("sv5", 2024),
    ("sv6", 2024),
    ("sv7", 2024),
    ("sv8", 2024),
];

/// 시리즈 접두사 (세부 세트가 목록에 없을 때). 긴 접두사를 먼저 검사합니다.
const PREFIX_SETS: &[(&str, i32)] = &[
    ("swsh", 2020),
    ("hgss", 2010),
    ("col", 2011),
    ("base", 1999),
    ("neo", 2000),
    ("gym", 2000),
    ("ecard", 2002),
    ("pop", 2004),
    ("dp", 2007),
    ("pl", 2009),
    ("bw", 2011),
    ("xy", 2014),
    ("sm", 2017),
    ("sv", 2023),
    ("ex", 2003),
];

/// 세트 식별자로 발매 연도를 추정합니다. 알 수 없으면 `None`.
pub fn release_year(set_id: &str) -> Option<i32> {
    let key = set_id.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some((_, year)) = EXACT_SETS.iter().find(|(id, _)| *id == key) {
        return Some(*year);
    }

    PREFIX_SETS
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|(_, year)| *year)
}
