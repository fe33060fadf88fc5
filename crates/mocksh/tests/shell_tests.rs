//! End-to-end shell execution tests
//!
//! Drives full command lines through a configured shell the way a
//! scenario module would: restricted allowlist, seeded filesystem, env
//! from a (simulated) learner session.

use mocksh::{Shell, ShellContext, VirtualFs};
use serde_json::json;

fn device_shell() -> Shell {
    let fs = VirtualFs::from_tree(&json!({
        "/home/user": {
            "readme.txt": "nothing to see here\n",
            "app": {
                "config.json": "{\"debug\":true}\n",
                "cache": { "session.tmp": "stale\n" },
            },
        },
        "/system/logs": { "boot.log": "kernel up\nservices up\n" },
    }))
    .expect("tree is valid");

    Shell::builder()
        .fs(fs)
        .allow([
            "echo", "help", "whoami", "pwd", "cd", "ls", "cat", "find", "grep", "findstr",
            "head", "tail", "wc", "seq", "xargs", "adb", "base64",
        ])
        .env("USER", "learner")
        .env("HOME", "/home/user")
        .env("ADB_LOGCAT", "I/PurpleApp: started\nD/Secret: Key = FLAG-42\nI/PurpleApp: done")
        .build()
}

#[tokio::test]
async fn logcat_leak_walkthrough() {
    let shell = device_shell();

    let result = shell.exec("adb logcat -d").await;
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.contains("D/Secret: Key = FLAG-42"));

    let result = shell.exec(r#"adb logcat -d | grep "Secret""#).await;
    assert_eq!(result.stdout, "D/Secret: Key = FLAG-42\n");

    // The Windows hint works identically.
    let result = shell.exec(r#"adb logcat -d | findstr "Secret""#).await;
    assert_eq!(result.stdout, "D/Secret: Key = FLAG-42\n");
}

#[tokio::test]
async fn filesystem_exploration_walkthrough() {
    let shell = device_shell();
    let mut ctx = ShellContext::new().env("HOME", "/home/user");

    let result = shell.exec_with("cd && pwd", &mut ctx).await;
    assert_eq!(result.stdout, "/home/user\n");

    let result = shell.exec_with("ls", &mut ctx).await;
    assert_eq!(result.stdout, "app\nreadme.txt\n");

    let result = shell.exec_with("find -name .tmp", &mut ctx).await;
    assert_eq!(result.stdout, "/home/user/app/cache/session.tmp\n");

    let result = shell.exec_with("cat app/config.json | grep debug", &mut ctx).await;
    assert_eq!(result.stdout, "{\"debug\":true}\n");
}

#[tokio::test]
async fn counting_pipeline() {
    let shell = device_shell();
    let result = shell.exec("cat /system/logs/boot.log | wc -l").await;
    assert_eq!(result.stdout, "2\n");
}

#[tokio::test]
async fn seq_directions() {
    let shell = device_shell();
    assert_eq!(shell.exec("seq 1 3").await.stdout, "1\n2\n3\n");
    assert_eq!(shell.exec("seq 3 1").await.stdout, "3\n2\n1\n");
}

#[tokio::test]
async fn xargs_recursive_invocation() {
    let shell = device_shell();
    let result = shell.exec("echo 'a b' | xargs -I{} echo {}").await;
    assert_eq!(result.stdout, "a\nb\n");
    assert_eq!(result.exit_code, 0);
}

#[tokio::test]
async fn for_loop_end_to_end() {
    let shell = device_shell();
    let result = shell
        .exec("for i in $(seq 1 3); do echo ${i}; done")
        .await;
    assert_eq!(result.stdout, "1\n2\n3\n");
    assert_eq!(result.exit_code, 0);
}

#[tokio::test]
async fn for_loop_descending() {
    let shell = device_shell();
    let result = shell
        .exec("for i in $(seq 3 1); do echo ${i}; done")
        .await;
    assert_eq!(result.stdout, "3\n2\n1\n");
}

#[tokio::test]
async fn for_loop_is_input_not_syntax() {
    // Anything that fails the one supported loop shape falls through to
    // the regular parser and dies on the unknown `for` command.
    let shell = device_shell();
    let result = shell.exec("for i in a b c; do echo $i; done").await;
    assert_eq!(result.exit_code, 126);
    assert_eq!(result.stderr, "command not allowed: for");
}

#[tokio::test]
async fn command_too_long_rejected() {
    let shell = device_shell();
    let command = format!("echo {}", "A".repeat(1_250));
    let result = shell.exec(&command).await;
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "command too long (max 1250)");
    assert_eq!(result.exit_code, 1);
}

#[tokio::test]
async fn curl_not_in_allowlist_here() {
    let shell = device_shell();
    let result = shell.exec("curl http://api.local/api/me").await;
    assert_eq!(result.exit_code, 126);
    assert_eq!(result.stderr, "command not allowed: curl");
}

#[tokio::test]
async fn pipeline_stops_at_failed_stage() {
    let shell = device_shell();
    let result = shell.exec("cat /missing.txt | wc -l").await;
    assert_eq!(result.exit_code, 1);
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "cat: /missing.txt: No such file or directory");
}

#[tokio::test]
async fn quoted_operators_reach_the_command() {
    let shell = device_shell();
    let result = shell.exec(r#"echo 'a|b && c'"#).await;
    assert_eq!(result.stdout, "a|b && c\n");
}

#[tokio::test]
async fn session_identity_from_env() {
    let shell = device_shell();
    let result = shell.exec("whoami").await;
    assert_eq!(result.stdout, "learner\n");

    let mut anonymous = ShellContext::new();
    let result = shell.exec_with("whoami", &mut anonymous).await;
    assert_eq!(result.stdout, "guest\n");
}

#[tokio::test]
async fn base64_round_trip_through_pipeline() {
    let shell = device_shell();
    let result = shell.exec("echo secret-token | base64").await;
    let encoded = result.stdout.trim_end().to_string();
    let result = shell.exec(&format!("base64 -d {encoded}")).await;
    assert_eq!(result.stdout, "secret-token\n");
}
