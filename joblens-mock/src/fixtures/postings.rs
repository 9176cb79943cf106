use joblens_core::{MarketDescriptor, Posting, SalaryHistogram, SearchPage, SearchRequest};

/// (market code, upstream listing total, typical local salary)
const MARKET_FIXTURES: [(&str, u64, u64); 10] = [
    ("US", 1_200, 120_000),
    ("GB", 800, 60_000),
    ("DE", 500, 65_000),
    ("CA", 300, 90_000),
    ("AU", 250, 110_000),
    ("FR", 200, 50_000),
    ("NL", 150, 60_000),
    ("SG", 100, 90_000),
    ("IN", 900, 1_500_000),
    ("BR", 0, 0),
];

fn lookup(market: &MarketDescriptor) -> (u64, u64) {
    MARKET_FIXTURES
        .iter()
        .find(|(code, _, _)| market.code.eq_ignore_ascii_case(code))
        .map_or((0, 0), |(_, count, salary)| (*count, *salary))
}

/// Listing total the fixtures report for `market`.
#[must_use]
pub fn listing_count(market: &MarketDescriptor) -> u64 {
    lookup(market).0
}

/// Typical local salary of `market`; also the sampled average of its fixture page.
#[must_use]
pub fn typical_salary(market: &MarketDescriptor) -> Option<u64> {
    Some(lookup(market).1).filter(|s| *s > 0)
}

pub fn search(market: &MarketDescriptor, req: &SearchRequest) -> SearchPage {
    let (count, salary) = lookup(market);
    if count == 0 {
        return SearchPage::default();
    }
    let salary = salary as f64;
    let q = req.query();
    let results = vec![
        Posting {
            title: format!("Senior {q} Engineer"),
            description: "Build services in Rust and Python on AWS. Remote friendly team."
                .to_string(),
            location: Some(market.name.to_string()),
            salary_min: Some(salary * 0.9),
            salary_max: Some(salary * 1.1),
            highlights: Vec::new(),
        },
        Posting {
            title: format!("{q} Developer"),
            description: "Work with Python, Docker and PostgreSQL.".to_string(),
            location: Some(market.name.to_string()),
            salary_min: Some(salary),
            salary_max: None,
            highlights: vec!["Kubernetes in production".to_string()],
        },
        Posting {
            title: format!("Junior {q} Developer"),
            description: "Agile team using Git and SQL.".to_string(),
            location: Some(market.name.to_string()),
            salary_min: None,
            salary_max: None,
            highlights: Vec::new(),
        },
        Posting {
            title: format!("{q} Platform Engineer"),
            description: "Own our Kubernetes clusters.".to_string(),
            location: Some("Remote".to_string()),
            salary_min: None,
            salary_max: None,
            highlights: Vec::new(),
        },
    ];
    SearchPage {
        count,
        results: results
            .into_iter()
            .take(req.page_size() as usize)
            .collect(),
    }
}

pub fn histogram(market: &MarketDescriptor) -> SalaryHistogram {
    let (count, salary) = lookup(market);
    if count == 0 {
        return SalaryHistogram::new();
    }
    SalaryHistogram::from([
        ((salary / 2).to_string(), 1),
        (salary.to_string(), 2),
        ((salary * 3 / 2).to_string(), 1),
    ])
}
