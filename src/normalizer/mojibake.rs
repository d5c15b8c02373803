use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;

/// Undo UTF-8 text that was decoded as Windows-1252, e.g. `StraÃŸe` → `Straße`.
///
/// Each maximal run of non-ASCII characters is repaired on its own, so one
/// unrepairable fragment does not block the rest of the string. Only runs
/// containing `Ã` or `Â` are touched. A run is repaired repeatedly for doubly
/// encoded text and stops as soon as a round cannot be applied. Each
/// successful round shortens the run, which bounds the loop.
pub fn repair(text: &str) -> Cow<'_, str> {
    if !looks_garbled(text) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(|c: char| !c.is_ascii()) {
        let (plain, tail) = rest.split_at(start);
        let end = tail.find(|c: char| c.is_ascii()).unwrap_or(tail.len());
        let (run, tail) = tail.split_at(end);
        out.push_str(plain);
        out.push_str(&repair_run(run));
        rest = tail;
    }
    out.push_str(rest);

    if out == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(out)
    }
}

fn repair_run(run: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(run);
    while looks_garbled(&current) {
        match redecode(&current) {
            Some(fixed) if fixed != *current => current = Cow::Owned(fixed),
            _ => break,
        }
    }
    current
}

fn looks_garbled(text: &str) -> bool {
    text.contains('Ã') || text.contains('Â')
}

fn redecode(text: &str) -> Option<String> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
    if unmappable {
        return None;
    }
    String::from_utf8(bytes.into_owned()).ok()
}
