//! Resume-offset arithmetic for parse resynchronisation.

/// New cumulative skip count after a syntax error at session-relative line
/// `reported_line`, with `skipped_so_far` lines already permanently bypassed.
///
/// Error line numbers are relative to the start of the active parse session,
/// not the file: every recovery starts a brand-new session, so the prior skip
/// total must be folded back in. The `+ 1` advances past the damaged line
/// itself; without it a single malformed document would retrigger the same
/// error forever.
pub fn resume_offset(reported_line: u64, skipped_so_far: u64) -> u64 {
    reported_line + skipped_so_far + 1
}
