use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::sanitize::sanitize;

const GREETINGS: [&str; 4] = ["hello", "hi", "hey", "help"];

const GREETING_TEMPLATE: &str = include_str!("responses/greeting.txt");
const MENU_TEMPLATE: &str = include_str!("responses/menu.txt");

/// Policy topics the offline responder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    RoadTax,
    PurchaseSubsidy,
    Manufacturing,
    ChargingInfrastructure,
    Scrappage,
    Application,
    PolicyOverview,
}

impl Topic {
    // Matchers overlap, so a prompt resolves to the first topic in this list
    pub const PRIORITY: [Topic; 7] = [
        Topic::RoadTax,
        Topic::PurchaseSubsidy,
        Topic::Manufacturing,
        Topic::ChargingInfrastructure,
        Topic::Scrappage,
        Topic::Application,
        Topic::PolicyOverview,
    ];

    fn pattern(self) -> &'static str {
        match self {
            Topic::RoadTax => {
                r"road\s*tax|tax.*waiver|waiver|registration.*fee|exemption|motor.*vehicle.*tax"
            }
            Topic::PurchaseSubsidy => {
                r"subsidy|subsidies|incentive|discount|purchase.*benefit|buyer|consumer|demand.*side|2.*wheel|3.*wheel|4.*wheel|scooter|car"
            }
            Topic::Manufacturing => {
                r"manufactur|msme|industry|factory|production|supply.*side|plant|capital|interest.*subsidy|sgst|unit|investment"
            }
            Topic::ChargingInfrastructure => {
                r"charging|charger|station|infrastructure|equipment|battery.*swap|connector|facilities|power|electric.*supply"
            }
            Topic::Scrappage => r"scrap|old.*vehicle|replace|retire|end.*of.*life|exchange|junk",
            Topic::Application => {
                r"apply|application|how.*to|procedure|process|steps|documentation|documents|eligibility|portal"
            }
            Topic::PolicyOverview => {
                r"policy|overview|detail|summary|vision|goal|objective|about|general.*information|validity|duration"
            }
        }
    }

    fn template(self) -> &'static str {
        match self {
            Topic::RoadTax => include_str!("responses/road_tax.txt"),
            Topic::PurchaseSubsidy => include_str!("responses/purchase_subsidy.txt"),
            Topic::Manufacturing => include_str!("responses/manufacturing.txt"),
            Topic::ChargingInfrastructure => include_str!("responses/charging.txt"),
            Topic::Scrappage => include_str!("responses/scrappage.txt"),
            Topic::Application => include_str!("responses/application.txt"),
            Topic::PolicyOverview => include_str!("responses/policy_overview.txt"),
        }
    }
}

lazy_static! {
    static ref RULES: Vec<(Topic, Regex)> = Topic::PRIORITY
        .iter()
        .map(|&topic| {
            let matcher = RegexBuilder::new(topic.pattern())
                .case_insensitive(true)
                .build()
                .unwrap();
            (topic, matcher)
        })
        .collect();
}

/// Which canned answer a prompt maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Greeting,
    Topic(Topic),
    Menu,
}

impl Reply {
    pub fn template(self) -> &'static str {
        match self {
            Reply::Greeting => GREETING_TEMPLATE,
            Reply::Topic(topic) => topic.template(),
            Reply::Menu => MENU_TEMPLATE,
        }
    }
}

/// Rule-based answers for when the completion provider can't help.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, prompt: &str) -> Reply {
        let query = prompt.trim().to_lowercase();

        if GREETINGS.contains(&query.as_str()) {
            return Reply::Greeting;
        }

        RULES
            .iter()
            .find(|(_, matcher)| matcher.is_match(&query))
            .map(|&(topic, _)| Reply::Topic(topic))
            .unwrap_or(Reply::Menu)
    }

    pub fn respond(&self, prompt: &str) -> String {
        let reply = self.classify(prompt);
        tracing::debug!(?reply, "fallback reply selected");
        sanitize(reply.template())
    }
}
