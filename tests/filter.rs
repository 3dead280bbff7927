use anyhow::{anyhow, Result};
use pretty_assertions::assert_eq;
use strace::syscalls;
use strace::{Action, Error, Event, EventCallback, FaultInjector, Rule, Signal};

#[macro_use]
mod support;
use support::*;

fn sysno(name: &str) -> Result<u64> {
    syscalls::number(name).ok_or_else(|| anyhow!("no syscall named `{name}`"))
}

#[test]
fn test_event_names() -> Result<()> {
    let openat = sysno("openat")?;

    assert_eq!(syscall_record(pid!(1), openat, true).event_name(), "Eopenat");
    assert_eq!(syscall_record(pid!(1), openat, false).event_name(), "Xopenat");
    assert_eq!(syscall_record(pid!(1), 999, true).event_name(), "E03e7");

    let child = record(pid!(1), Event::NewChild { pid: pid!(2) });
    assert_eq!(child.event_name(), "NewChild");

    let stop = record(pid!(1), Event::SignalStop { signal: Signal::SIGCHLD });
    assert_eq!(stop.event_name(), "SignalStop");

    Ok(())
}

#[test]
fn test_first_match() -> Result<()> {
    let injector = FaultInjector::from_rules(["E.*open.*,error,-2"])?;

    let rule = injector.evaluate("Eopenat").ok_or_else(|| anyhow!("no match"))?;
    assert_eq!(rule.action(), Action::Error);
    assert_eq!(rule.value(), -2);

    assert!(injector.evaluate("Xwrite").is_none());

    Ok(())
}

#[test]
fn test_rules_are_ordered() -> Result<()> {
    let injector = FaultInjector::from_rules(["Ewrite,log,", "E.*,error,-1"])?;

    let actions: Vec<Option<Action>> = ["Ewrite", "Eread", "Xread"]
        .iter()
        .map(|name| injector.evaluate(name).map(Rule::action))
        .collect();

    assert_eq!(actions, vec![Some(Action::Log), Some(Action::Error), None]);

    Ok(())
}

#[test]
fn test_duplicate_pattern_rejected() -> Result<()> {
    let res = FaultInjector::from_rules(["Eread,log,", "Eread,error,-1"]);
    assert!(matches!(res, Err(Error::Rule(_))));

    let mut injector = FaultInjector::new();
    injector.add("Eread,log,".parse()?)?;
    assert!(injector.add(Rule::new("Eread", Action::Error, -5)?).is_err());
    assert_eq!(injector.rules().len(), 1);

    Ok(())
}

#[test]
fn test_malformed_rules() {
    for rule in ["Eread", "Eread,log", "Eread,panic,1", "Eread,error,", "Eread,error,x", "(,log,"] {
        let res: strace::Result<Rule> = rule.parse();
        assert!(matches!(res, Err(Error::Rule(_))), "{rule}: {res:?}");
    }
}

#[test]
fn test_injector_as_callback() -> Result<()> {
    let task = FakeTask::new();
    let child = record(pid!(1), Event::NewChild { pid: pid!(2) });
    let exit = record(pid!(1), Event::Exit { exit_code: 0 });

    let mut logging = FaultInjector::from_rules(["NewChild,log,"])?;
    assert!(logging.on_event(&task, &child).is_ok());

    let mut failing = FaultInjector::from_rules(["^NewChild$,error,-1"])?;
    assert!(failing.on_event(&task, &exit).is_ok());

    match failing.on_event(&task, &child) {
        Err(Error::FaultInjected { event, value }) => {
            assert_eq!(event, "NewChild");
            assert_eq!(value, -1);
        },
        res => panic!("expected injected fault, got {res:?}"),
    }

    Ok(())
}
