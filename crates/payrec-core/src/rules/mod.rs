//! Event classification rules and the line grammars of each report family.
//!
//! A [`RuleTable`] maps a document to an event label by substring match.
//! Rules are evaluated strictly in list order and the first hit wins, so the
//! operator resolves overlapping match texts by ordering: a phrase must be
//! listed before any shorter phrase it contains.

pub mod patterns;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Label used when no rule matches a document.
pub const UNCLASSIFIED_LABEL: &str = "Não Classificado";

/// Document family a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Extra-hours / bonus reports; the label becomes the event column.
    Extras,
    /// Payroll and net-pay runs; the label becomes the period tag.
    Payroll,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Extras => "extras",
            Category::Payroll => "payroll",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extras" | "extra" => Ok(Category::Extras),
            "payroll" | "folha" => Ok(Category::Payroll),
            other => Err(format!("unknown rule category: {}", other)),
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRule {
    /// Substring searched for in the document text.
    pub match_text: String,
    /// Label assigned when the substring is found.
    pub event_name: String,
    /// Family the rule applies to.
    pub category: Category,
}

impl EventRule {
    pub fn new(
        match_text: impl Into<String>,
        event_name: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            match_text: match_text.into(),
            event_name: event_name.into(),
            category,
        }
    }

    /// Whether this rule fires on `text`. Empty match texts never fire.
    pub fn matches(&self, text: &str) -> bool {
        !self.match_text.is_empty() && text.contains(&self.match_text)
    }
}

/// Outcome of classifying a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A rule matched; carries its event name.
    Event(String),
    /// No rule matched.
    Unclassified,
}

impl Classification {
    /// Event name, or [`UNCLASSIFIED_LABEL`].
    pub fn label(&self) -> &str {
        match self {
            Classification::Event(name) => name,
            Classification::Unclassified => UNCLASSIFIED_LABEL,
        }
    }

    /// Event name as a period tag; the main run (no match) is the empty tag.
    pub fn period_tag(&self) -> String {
        match self {
            Classification::Event(name) => name.clone(),
            Classification::Unclassified => String::new(),
        }
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, Classification::Unclassified)
    }
}

/// Ordered rule list; first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<EventRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<EventRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules for the report names the vendor ships.
    pub fn builtin() -> Self {
        Self::new(vec![
            EventRule::new("D.S.R. Sobre Horas Extras", "D.S.R. Sobre Horas Extras", Category::Extras),
            EventRule::new("Horas Extras 50%", "Horas Extras 50%", Category::Extras),
            EventRule::new("Horas Extras 100%", "Horas Extras 100%", Category::Extras),
            EventRule::new("Hora Extras 100%", "Horas Extras 100%", Category::Extras),
            EventRule::new("Bonificação Extraordinária", "Bonificação Extraordinária", Category::Extras),
            EventRule::new("Folha de Adiantamento", "Adiantamento", Category::Payroll),
            EventRule::new("Liquido de Adiantamento", "Adiantamento", Category::Payroll),
            EventRule::new("Líquido de Adiantamento", "Adiantamento", Category::Payroll),
        ])
    }

    pub fn rules(&self) -> &[EventRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify `text` against every rule regardless of category.
    pub fn classify(&self, text: &str) -> Classification {
        self.first_match(text, |_| true)
    }

    /// Classify `text` against the rules of one category only.
    pub fn classify_in(&self, text: &str, category: Category) -> Classification {
        self.first_match(text, |rule| rule.category == category)
    }

    fn first_match(&self, text: &str, filter: impl Fn(&EventRule) -> bool) -> Classification {
        for (position, rule) in self.rules.iter().enumerate() {
            if !filter(rule) {
                continue;
            }
            trace!("Trying rule {} ({:?})", position, rule.match_text);
            if rule.matches(text) {
                debug!("Rule {} matched -> {}", position, rule.event_name);
                return Classification::Event(rule.event_name.clone());
            }
        }
        Classification::Unclassified
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: EventRule) {
        self.rules.push(rule);
    }

    /// Insert a rule at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, rule: EventRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    /// Remove the rule at `index`.
    pub fn remove(&mut self, index: usize) -> Option<EventRule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Move the rule at `from` to position `to`. Returns false if `from` is out of range.
    pub fn move_rule(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rules.len() {
            return false;
        }
        let rule = self.rules.remove(from);
        let to = to.min(self.rules.len());
        self.rules.insert(to, rule);
        true
    }
}

impl FromIterator<EventRule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = EventRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
