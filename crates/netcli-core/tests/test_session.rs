mod common;

use common::{connected_session, wrote, ScriptedTransport};
use netcli_core::{ConfigSetOptions, NetcliError, SendOptions};
use std::time::Duration;

const IOS_CONNECT: &[&str] = &[
    "Welcome to lab-router. Unauthorized access prohibited.\r\nRouter>",
    "\r\nRouter>",
    "terminal length 0\r\nRouter>",
];

#[tokio::test]
async fn cisco_ios_send_command_returns_clean_output() {
    let mut chunks = IOS_CONNECT.to_vec();
    chunks.push("show version\r\nCisco IOS Software, Version 15.2(4)M7\r\nRouter>");
    let (mut session, writes) = connected_session("cisco_ios", &chunks).await;

    assert_eq!(session.base_prompt(), "Router");

    let output = session.send_command("show version").await.unwrap();
    assert_eq!(output, "Cisco IOS Software, Version 15.2(4)M7");

    // The cleaned output neither echoes the command nor ends with a prompt
    assert!(!output.starts_with("show version"));
    assert!(!output.lines().last().unwrap().contains("Router"));
    assert!(wrote(&writes, "show version\n"));
    assert!(wrote(&writes, "terminal length 0\n"));

    session.disconnect().await;
    assert!(!session.is_connected());
}

#[tokio::test]
async fn strip_flags_can_be_disabled() {
    let mut chunks = IOS_CONNECT.to_vec();
    chunks.push("show clock\r\n*10:02:13.335 UTC\r\nRouter>");
    let (mut session, _writes) = connected_session("cisco_ios", &chunks).await;

    let options = SendOptions::new().strip_prompt(false).strip_command(false);
    let output = session.send_command_with("show clock", &options).await.unwrap();
    assert!(output.starts_with("show clock\n"));
    assert!(output.ends_with("Router>"));
}

#[tokio::test]
async fn enable_mode_answers_the_password_prompt() {
    let mut chunks = IOS_CONNECT.to_vec();
    chunks.extend([
        "\r\nRouter>",          // mode probe: still in exec
        "enable\r\nPassword: ", // device asks for the enable secret
        "\r\nRouter#",
        "\r\nRouter#", // verification probe
    ]);
    let (mut session, writes) = connected_session("cisco_ios", &chunks).await;

    session.enter_mode("enable").await.unwrap();
    assert_eq!(session.current_mode(), Some("enable"));
    assert!(wrote(&writes, "enablepass\n"));
    assert!(session.check_mode("enable", false).await.unwrap());
}

const JUNOS_CONNECT: &[&str] = &[
    "Last login: Tue Jul 28 09:14:11 2026\r\nadmin@srx% ",
    "\r\nadmin@srx% ",  // cli mode probe: still in the csh shell
    "cli\r\nadmin@srx> ",
    "\r\nadmin@srx> ",  // cli verification probe
    "\r\nadmin@srx> ",  // prompt discovery
    "set cli screen-length 0\r\nadmin@srx> ",
];

#[tokio::test]
async fn junos_config_set_commits_and_exits() {
    let mut chunks = JUNOS_CONNECT.to_vec();
    chunks.extend([
        "\r\nadmin@srx> ", // config mode probe
        "configure\r\nEntering configuration mode\r\n[edit]\r\nadmin@srx# ",
        "\r\n[edit]\r\nadmin@srx# ",
        "set system host-name x\r\n[edit]\r\nadmin@srx# ",
        "commit\r\ncommit complete\r\n[edit]\r\nadmin@srx# ",
        "exit\r\nExiting configuration mode\r\nadmin@srx> ",
        "\r\nadmin@srx> ", // exit verification probe
    ]);
    let (mut session, writes) = connected_session("juniper_junos", &chunks).await;

    assert_eq!(session.base_prompt(), "srx");
    assert_eq!(session.current_mode(), Some("cli"));

    let output = session
        .send_config_set(&["set system host-name x"])
        .await
        .unwrap();
    assert!(output.contains("commit complete"));
    assert!(wrote(&writes, "commit\n"));
    assert_eq!(session.current_mode(), Some("cli"));
}

#[tokio::test]
async fn junos_commit_errors_are_reported_without_poisoning() {
    let mut chunks = JUNOS_CONNECT.to_vec();
    chunks.extend([
        "\r\nadmin@srx> ",
        "configure\r\nEntering configuration mode\r\n[edit]\r\nadmin@srx# ",
        "\r\n[edit]\r\nadmin@srx# ",
        "set bogus\r\n[edit]\r\nadmin@srx# ",
        "commit\r\nerror: commit failed: syntax error\r\n[edit]\r\nadmin@srx# ",
    ]);
    let (mut session, _writes) = connected_session("juniper_junos", &chunks).await;

    let err = session.send_config_set(&["set bogus"]).await.unwrap_err();
    match err {
        NetcliError::CommitError { host, reason } => {
            assert_eq!(host, "192.0.2.1");
            assert!(reason.contains("commit failed"));
        }
        other => panic!("expected commit error, got {:?}", other),
    }
    // A commit failure leaves the channel in a known state
    assert!(session.is_connected());
}

#[tokio::test]
async fn comware_config_set_stays_in_system_view() {
    let chunks = [
        "\r\n<HP>",
        "\r\n<HP>",
        "screen-length disable\r\n<HP>",
        "\r\n<HP>", // system view probe
        "system-view\r\nSystem View: return to User View with Ctrl+Z.\r\n[HP]",
        "\r\n[HP]", // system view verification probe
        "vlan 10\r\n[HP-vlan10]",
    ];
    let (mut session, writes) = connected_session("hp_comware", &chunks).await;

    assert_eq!(session.base_prompt(), "HP");

    let output = session.send_config_set(&["vlan 10"]).await.unwrap();
    assert!(output.contains("[HP-vlan10]"));
    assert!(wrote(&writes, "system-view\n"));
    // Comware stays in system view by default
    assert_eq!(session.current_mode(), Some("system_view"));
}

#[tokio::test]
async fn xr_config_exit_answers_uncommitted_changes() {
    let chunks = [
        "\r\nRP/0/RP0/CPU0:ios#",
        "\r\nRP/0/RP0/CPU0:ios#",
        "terminal length 0\r\nRP/0/RP0/CPU0:ios#",
        "\r\nRP/0/RP0/CPU0:ios#", // enable probe: already privileged
        "\r\nRP/0/RP0/CPU0:ios#", // config probe: not yet in config
        "configure terminal\r\nRP/0/RP0/CPU0:ios(config)#",
        "\r\nRP/0/RP0/CPU0:ios(config)#",
        "hostname x\r\nRP/0/RP0/CPU0:ios(config)#",
        "end\r\nUncommitted changes found, commit them before exiting(yes/no/cancel)? [cancel]:",
        "\r\nRP/0/RP0/CPU0:ios#",
        "\r\nRP/0/RP0/CPU0:ios#", // exit verification probe
    ];
    let (mut session, writes) = connected_session("cisco_ios_xr", &chunks).await;

    let options = ConfigSetOptions::new().with_commit(false);
    session
        .send_config_set_with(&["hostname x"], &options)
        .await
        .unwrap();

    assert!(wrote(&writes, "no\n"));
    assert_eq!(session.current_mode(), Some("enable"));
}

#[tokio::test]
async fn terminal_profile_skips_prompt_discovery() {
    let chunks = [
        "Linux box 5.10.0\r\nuser@box:~$ ",
        "ls\r\nfile1\r\nuser@box:~$ ",
    ];
    let (mut session, _writes) = connected_session("terminal", &chunks).await;

    // No probe ran, so no base prompt was derived
    assert_eq!(session.base_prompt(), "");

    let output = session.send_command("ls").await.unwrap();
    assert_eq!(output, "file1");
}

#[tokio::test]
async fn routeros_output_is_stripped_of_ansi_sequences() {
    let chunks = [
        "\r\n[admin@MikroTik] > ",
        "\r\n[admin@MikroTik] > ",
        "/system identity print\r\n\u{1b}[m name: MikroTik\r\n[admin@MikroTik] > ",
    ];
    let (mut session, _writes) = connected_session("mikrotik_routeros", &chunks).await;

    let output = session.send_command("/system identity print").await.unwrap();
    assert_eq!(output, " name: MikroTik");
}

#[tokio::test]
async fn timeout_poisons_the_session() {
    // The script ends after connect; the next read suspends forever
    let (mut session, _writes) = connected_session("cisco_ios", IOS_CONNECT).await;

    let err = session.send_command("show tech-support").await.unwrap_err();
    assert!(matches!(err, NetcliError::TimeoutError { .. }));

    // The session is poisoned: every operation but disconnect is refused
    let err = session.send_command("show version").await.unwrap_err();
    match err {
        NetcliError::ConnectionError { host, reason } => {
            assert_eq!(host, "192.0.2.1");
            assert!(reason.contains("unusable"));
        }
        other => panic!("expected connection error, got {:?}", other),
    }
    assert!(!session.is_connected());

    // disconnect is still valid and idempotent
    session.disconnect().await;
    session.disconnect().await;
}

#[tokio::test]
async fn read_for_overrides_the_session_timeout() {
    let (mut session, _writes) = connected_session("cisco_ios", IOS_CONNECT).await;

    let start = std::time::Instant::now();
    let err = session
        .send_command_timing("show processes", Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, NetcliError::TimeoutError { .. }));
    assert!(start.elapsed() < Duration::from_millis(400));
}

#[tokio::test]
async fn empty_config_set_is_a_no_op() {
    let (mut session, writes) = connected_session("cisco_ios", IOS_CONNECT).await;
    let before = writes.lock().unwrap().len();

    let output = session.send_config_set(&[]).await.unwrap();
    assert_eq!(output, "");
    assert_eq!(writes.lock().unwrap().len(), before);
}

#[tokio::test]
async fn commands_are_rejected_before_connect() {
    let mut session = common::session("cisco_ios");
    let err = session.send_command("show version").await.unwrap_err();
    assert!(matches!(err, NetcliError::ConnectionError { .. }));
}

#[tokio::test]
async fn connect_failure_leaves_a_dead_session() {
    let mut session = common::session("cisco_ios");
    // No delimiter ever arrives, so the banner flush times out
    let (transport, _writes) = ScriptedTransport::new(&["logging in..."]);
    let err = session.connect_over(Box::new(transport)).await.unwrap_err();
    assert!(matches!(err, NetcliError::TimeoutError { .. }));

    let err = session.send_command("show version").await.unwrap_err();
    assert!(matches!(err, NetcliError::ConnectionError { .. }));
}
