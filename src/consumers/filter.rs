//! Rule-based syscall fault injection.
//!
//! Rules match record event names (see [`TraceRecord::event_name()`]) and are written as
//! `<event-name-regex>,<error|log>,<value>`, e.g. `E.*open.*,error,-2` or `NewChild,log,`.
//!
//! ptrace can't rewrite a syscall's return value here, so the `error` action can't make
//! the syscall fail. It reports the intended value and ends the session instead, which
//! kills the traced command.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::memory::Task;
use crate::record::TraceRecord;

use super::EventCallback;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// End the session with [`Error::FaultInjected`].
    Error,

    /// Log the match and continue.
    Log,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "error" => Ok(Action::Error),
            "log" => Ok(Action::Log),
            _ => Err(Error::Rule(format!("unknown action `{s}`, expected `error` or `log`"))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Error => write!(f, "error"),
            Action::Log => write!(f, "log"),
        }
    }
}

/// One `(pattern, action, value)` rule.
#[derive(Clone, Debug)]
pub struct Rule {
    pattern: Regex,
    action: Action,
    value: i64,
}

impl Rule {
    pub fn new(pattern: &str, action: Action, value: i64) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|err| Error::Rule(format!("bad pattern `{pattern}`: {err}")))?;

        Ok(Self { pattern, action, value })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Return `true` if the pattern matches anywhere in `event_name`.
    pub fn matches(&self, event_name: &str) -> bool {
        self.pattern.is_match(event_name)
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // The pattern may itself contain commas, so split from the right.
        let mut fields = s.rsplitn(3, ',');

        let (value, action, pattern) = match (fields.next(), fields.next(), fields.next()) {
            (Some(value), Some(action), Some(pattern)) => (value, action, pattern),
            _ => {
                return Err(Error::Rule(format!(
                    "`{s}` is not of the form `<pattern>,<error|log>,<value>`"
                )))
            },
        };

        let action: Action = action.trim().parse()?;
        let value = value.trim();

        let value: i64 = match (action, value.is_empty()) {
            (Action::Log, true) => 0,
            (Action::Error, true) => {
                return Err(Error::Rule(format!("`{s}`: the `error` action requires a value")))
            },
            _ => value
                .parse()
                .map_err(|err| Error::Rule(format!("`{s}`: bad value `{value}`: {err}")))?,
        };

        Rule::new(pattern, action, value)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.pattern(), self.action, self.value)
    }
}

/// Applies an ordered list of rules to every record. The first matching rule wins.
#[derive(Clone, Debug, Default)]
pub struct FaultInjector {
    rules: Vec<Rule>,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add each rule in order.
    pub fn from_rules<I, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut injector = Self::new();

        for rule in rules {
            injector.add(rule.as_ref().parse()?)?;
        }

        Ok(injector)
    }

    /// Append `rule`. Fails if a rule with the same pattern was already added.
    pub fn add(&mut self, rule: Rule) -> Result<()> {
        if self.rules.iter().any(|r| r.pattern() == rule.pattern()) {
            return Err(Error::Rule(format!("duplicate rule for pattern `{}`", rule.pattern())));
        }

        self.rules.push(rule);

        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Return the first rule matching `event_name`, if any.
    pub fn evaluate(&self, event_name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(event_name))
    }
}

impl EventCallback for FaultInjector {
    fn on_event(&mut self, _task: &dyn Task, record: &TraceRecord) -> Result<()> {
        let event = record.event_name();

        let rule = match self.evaluate(&event) {
            Some(rule) => rule,
            None => return Ok(()),
        };

        match rule.action() {
            Action::Log => {
                info!(pid = record.pid.as_raw(), %event, rule = %rule, "rule matched");
                Ok(())
            },
            Action::Error => {
                let value = rule.value();
                warn!(pid = record.pid.as_raw(), %event, value, "injecting fault, ending trace");
                Err(Error::FaultInjected { event, value })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_may_contain_commas() {
        let rule: Rule = "E(read|write){1,2},log,".parse().unwrap();

        assert_eq!(rule.pattern(), "E(read|write){1,2}");
        assert_eq!(rule.action(), Action::Log);
        assert_eq!(rule.value(), 0);
    }

    #[test]
    fn test_rule_display() {
        let rule: Rule = "NewChild, error, -1".parse().unwrap();

        assert_eq!(rule.to_string(), "NewChild,error,-1");
    }
}
