/// Split a published payload into delivery units.
///
/// Every piece between `'\n'` separators becomes one line with its newline
/// restored, so `"A\nB"` yields `["A\n", "B\n"]` and a trailing newline
/// yields a final `"\n"`.
pub fn split_lines<D: std::fmt::Display + ?Sized>(data: &D) -> Vec<String> {
    data.to_string()
        .split('\n')
        .map(|line| format!("{line}\n"))
        .collect()
}
