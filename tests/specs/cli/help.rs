use crate::prelude::*;

#[test]
fn help_lists_the_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("escalctl")
        .stdout_has("start")
        .stdout_has("status")
        .stdout_has("add")
        .stdout_has("cancel")
        .stdout_has("register")
        .stdout_has("unregister");
}

#[test]
fn unknown_subcommand_fails_with_a_usage_error() {
    cli().args(&["not-a-real-command"]).fails();
}
