//! Tests for argument parsing of every subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use apnretry_core::{GenericError, TunnelError, UnthrottleEvent};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_validate() {
    match parse(&["apnretry", "validate", "/tmp/carrier.json"]) {
        CliCommand::Validate { path } => assert_eq!(path, Path::new("/tmp/carrier.json")),
        _ => panic!("expected Validate"),
    }
}

#[test]
fn cli_parse_match() {
    match parse(&["apnretry", "match", "--apn", "ims", "--error", "protocol:24"]) {
        CliCommand::Match { apn, error, policy } => {
            assert_eq!(apn, "ims");
            assert_eq!(error, TunnelError::Protocol(24));
            assert!(policy.is_none());
        }
        _ => panic!("expected Match"),
    }
}

#[test]
fn cli_parse_simulate_defaults() {
    match parse(&["apnretry", "simulate", "--apn", "ims", "--error", "generic:io"]) {
        CliCommand::Simulate {
            apn,
            error,
            count,
            policy,
            explicit_delay_secs,
            alternates,
            event,
        } => {
            assert_eq!(apn, "ims");
            assert_eq!(error, TunnelError::Generic(GenericError::IoFailure));
            assert_eq!(count, 5);
            assert!(policy.is_none());
            assert!(explicit_delay_secs.is_none());
            assert_eq!(alternates, 1);
            assert!(event.is_none());
        }
        _ => panic!("expected Simulate"),
    }
}

#[test]
fn cli_parse_simulate_all_flags() {
    match parse(&[
        "apnretry",
        "simulate",
        "--apn",
        "ims",
        "--error",
        "protocol:15500",
        "--count",
        "12",
        "--policy",
        "/tmp/p.json",
        "--explicit-delay-secs",
        "90",
        "--alternates",
        "2",
        "--event",
        "APM_ENABLE_EVENT",
    ]) {
        CliCommand::Simulate {
            count,
            policy,
            explicit_delay_secs,
            alternates,
            event,
            ..
        } => {
            assert_eq!(count, 12);
            assert_eq!(policy.as_deref(), Some(Path::new("/tmp/p.json")));
            assert_eq!(explicit_delay_secs, Some(90));
            assert_eq!(alternates, 2);
            assert_eq!(event, Some(UnthrottleEvent::ApmEnable));
        }
        _ => panic!("expected Simulate"),
    }
}

#[test]
fn cli_parse_status() {
    match parse(&["apnretry", "status"]) {
        CliCommand::Status => {}
        _ => panic!("expected Status"),
    }
}

#[test]
fn cli_rejects_bad_descriptor_and_event() {
    assert!(Cli::try_parse_from(["apnretry", "match", "--apn", "ims", "--error", "protocol:x"]).is_err());
    assert!(Cli::try_parse_from([
        "apnretry", "simulate", "--apn", "ims", "--error", "none", "--event", "REBOOT_EVENT",
    ])
    .is_err());
}
