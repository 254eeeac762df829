//! Country market data: currency plus qualitative labor-market facts used to ground prompts.
//!
//! Pure lookup, no I/O. Curated data covers the major economies below; every other country
//! gets the generic profile, and names missing from the registry also fall back to USD.

pub mod registry;

use serde::Serialize;

use crate::market::registry::{currency_for, currency_symbol};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryMarketData {
    pub name: String,
    pub currency: String,
    pub symbol: String,
    pub major_industries: Vec<String>,
    pub job_market_condition: String,
    pub work_visa_required: bool,
    pub languages: Vec<String>,
    pub cost_of_living_index: String,
}

struct MarketProfile {
    industries: &'static [&'static str],
    condition: &'static str,
    visa_required: bool,
    languages: &'static [&'static str],
    cost_of_living: &'static str,
}

const FALLBACK_CURRENCY: &str = "USD";

const GENERIC_PROFILE: MarketProfile = MarketProfile {
    industries: &["Technology", "Finance", "Healthcare"],
    condition: "Competitive",
    visa_required: true,
    languages: &["English"],
    cost_of_living: "Medium",
};

const CURATED_PROFILES: &[(&str, MarketProfile)] = &[
    (
        "United States",
        MarketProfile {
            industries: &["Technology", "Healthcare", "Finance", "Manufacturing", "Entertainment"],
            condition: "Strong with high competition in tech hubs",
            visa_required: true,
            languages: &["English"],
            cost_of_living: "High (varies by state)",
        },
    ),
    (
        "United Kingdom",
        MarketProfile {
            industries: &[
                "Financial Services",
                "Technology",
                "Creative Industries",
                "Healthcare",
                "Manufacturing",
            ],
            condition: "Stable with Brexit-related changes",
            visa_required: true,
            languages: &["English"],
            cost_of_living: "High (especially London)",
        },
    ),
    (
        "Germany",
        MarketProfile {
            industries: &["Automotive", "Manufacturing", "Technology", "Engineering", "Renewable Energy"],
            condition: "Strong demand for skilled workers",
            visa_required: true,
            languages: &["German", "English in tech"],
            cost_of_living: "Medium to High",
        },
    ),
    (
        "Canada",
        MarketProfile {
            industries: &["Technology", "Natural Resources", "Healthcare", "Finance", "Manufacturing"],
            condition: "Growing with immigration-friendly policies",
            visa_required: true,
            languages: &["English", "French"],
            cost_of_living: "Medium to High",
        },
    ),
    (
        "Australia",
        MarketProfile {
            industries: &["Mining", "Technology", "Healthcare", "Education", "Tourism"],
            condition: "Strong with skills shortages in key areas",
            visa_required: true,
            languages: &["English"],
            cost_of_living: "High",
        },
    ),
    (
        "France",
        MarketProfile {
            industries: &["Luxury Goods", "Technology", "Aerospace", "Healthcare", "Tourism"],
            condition: "Moderate with strong worker protections",
            visa_required: true,
            languages: &["French", "English in international companies"],
            cost_of_living: "Medium to High",
        },
    ),
    (
        "Netherlands",
        MarketProfile {
            industries: &["Technology", "Finance", "Logistics", "Agriculture", "Creative Industries"],
            condition: "Strong with English-friendly work environment",
            visa_required: true,
            languages: &["Dutch", "English widely accepted"],
            cost_of_living: "High",
        },
    ),
    (
        "Singapore",
        MarketProfile {
            industries: &["Finance", "Technology", "Logistics", "Healthcare", "Manufacturing"],
            condition: "Competitive with focus on skilled professionals",
            visa_required: true,
            languages: &["English", "Mandarin", "Malay"],
            cost_of_living: "Very High",
        },
    ),
    (
        "Japan",
        MarketProfile {
            industries: &["Technology", "Automotive", "Manufacturing", "Gaming", "Robotics"],
            condition: "Aging workforce creating opportunities",
            visa_required: true,
            languages: &["Japanese", "English in international companies"],
            cost_of_living: "High",
        },
    ),
    (
        "Switzerland",
        MarketProfile {
            industries: &["Finance", "Pharmaceuticals", "Technology", "Manufacturing", "Tourism"],
            condition: "Excellent but highly competitive",
            visa_required: true,
            languages: &["German", "French", "Italian", "English"],
            cost_of_living: "Very High",
        },
    ),
];

/// One record per requested country, in input order.
pub fn market_data_for<S: AsRef<str>>(countries: &[S]) -> Vec<CountryMarketData> {
    countries.iter().map(|c| lookup(c.as_ref())).collect()
}

/// Market data for a single country display name. The returned `name` is the caller's.
pub fn lookup(country: &str) -> CountryMarketData {
    let currency = currency_for(country).unwrap_or(FALLBACK_CURRENCY);
    let profile = curated_profile(country).unwrap_or(&GENERIC_PROFILE);

    CountryMarketData {
        name: country.to_string(),
        currency: currency.to_string(),
        symbol: currency_symbol(currency).to_string(),
        major_industries: to_owned(profile.industries),
        job_market_condition: profile.condition.to_string(),
        work_visa_required: profile.visa_required,
        languages: to_owned(profile.languages),
        cost_of_living_index: profile.cost_of_living.to_string(),
    }
}

fn curated_profile(country: &str) -> Option<&'static MarketProfile> {
    let country = country.trim();
    CURATED_PROFILES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(country))
        .map(|(_, profile)| profile)
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
