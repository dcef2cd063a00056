pub type CmdResult<T> = pyrename::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod refactor;

/// Run the command and map its result to JSON.
pub(crate) fn run_json(
    args: refactor::RefactorArgs,
    global: &GlobalArgs,
) -> (pyrename::Result<serde_json::Value>, i32) {
    crate::tty::status("pyrename is working...");

    crate::output::map_cmd_result_to_json(refactor::run(args, global))
}
