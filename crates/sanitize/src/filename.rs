//! Internal implementation of filename sanitization.

/// Maximum byte length for the basename, extension excluded.
///
/// 255 bytes is the common per-component limit across ext4, APFS, NTFS and
/// friends; the extension is kept outside the budget so a long name never
/// loses its type suffix.
const MAX_BASENAME_BYTES: usize = 255;

/// Sanitizes an untrusted filename.
///
/// The result is safe for any POSIX/Windows-compatible filesystem and for
/// rendering in HTML contexts. Processing order:
///
/// 1. HTML-special characters are escaped (so a raw name rendered without
///    re-escaping stays inert); the escape punctuation is then itself subject
///    to the denylist below.
/// 2. Every denylisted character becomes `-`: filesystem-reserved
///    characters, ASCII controls, DEL / NBSP / SOFT HYPHEN, URI-reserved
///    punctuation and URL-unsafe symbols.
/// 3. Leading `.` and `-` are trimmed, so the result can never look like a
///    hidden file or a relative-path artifact.
/// 4. With `beautify`, runs of spaces/underscores/hyphens collapse to a
///    single hyphen, hyphen-dot clusters and repeated dots collapse to a
///    single dot, and the name is lowercased.
/// 5. The basename is cut to 255 bytes on a char boundary, extension
///    preserved outside the budget.
///
/// The function is a fixed point: `sanitize(&sanitize(x, b), b)` equals
/// `sanitize(x, b)` for every input. An input that consists entirely of
/// denylisted characters sanitizes to the empty string; callers decide
/// whether that is an error (the storage coordinator treats it as one).
///
/// # Arguments
///
/// * `name` - The original client-supplied filename.
/// * `beautify` - Apply the collapsing/lowercasing pass from step 4.
///
/// # Returns
///
/// The sanitized filename, possibly empty.
pub fn sanitize(name: &str, beautify: bool) -> String {
    let escaped = escape_html(name);
    let replaced: String = escaped
        .chars()
        .map(|ch| if is_denylisted(ch) { '-' } else { ch })
        .collect();
    let trimmed = replaced.trim_start_matches(['.', '-']);

    let cleaned = if beautify {
        beautify_filename(trimmed)
    } else {
        trimmed.to_owned()
    };

    enforce_basename_budget(&cleaned, beautify)
}

/// Slugifies a filename, preserving its extension.
///
/// The stem is reduced to lowercase ASCII alphanumerics with single hyphens
/// between words; everything else (including non-ASCII) acts as a word
/// separator. An empty slug yields an empty string, extension included —
/// callers treat that the same way as an empty sanitized name.
///
/// # Arguments
///
/// * `filename` - A filename, typically already sanitized.
///
/// # Returns
///
/// The slugified filename, possibly empty.
pub fn slugify(filename: &str) -> String {
    let (stem, extension) = split_extension(filename);

    let mut slug = String::with_capacity(stem.len());
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        return slug;
    }
    match extension {
        Some(ext) => format!("{slug}.{ext}"),
        None => slug,
    }
}

/// Escapes the five HTML-special characters.
///
/// Mirrors the conventional `& < > " '` entity set. The introduced `&`, `;`
/// and `#` are URI-reserved and fall to the denylist afterwards, which is
/// intentional: the escape exists so that nothing resembling live markup
/// survives into the stored name.
fn escape_html(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Returns true if `ch` must not appear in a stored filename.
fn is_denylisted(ch: char) -> bool {
    matches!(ch,
        // filesystem reserved
        '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'
        // ASCII control characters
        | '\u{0000}'..='\u{001F}'
        // non-printing: DEL, NO-BREAK SPACE, SOFT HYPHEN
        | '\u{007F}' | '\u{00A0}' | '\u{00AD}'
        // URI reserved (RFC 3986 §2.2)
        | '#' | '[' | ']' | '@' | '!' | '$' | '&' | '\'' | '(' | ')'
        | '+' | ',' | ';' | '='
        // URL unsafe (RFC 1738)
        | '{' | '}' | '^' | '~' | '`')
}

/// The `beautify` pass: separator collapsing, dot clustering, lowercasing.
fn beautify_filename(name: &str) -> String {
    // "file   name.zip" / "file___name.zip" / "file---name.zip"
    // all become "file-name.zip"
    let mut collapsed = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = if ch == ' ' || ch == '_' { '-' } else { ch };
        if ch == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(ch);
    }

    // "file--.--.-.--name.zip" and "file...name..zip" become "file.name.zip":
    // hyphen runs touching a dot are dropped, dot runs collapse to one.
    let mut clustered = String::with_capacity(collapsed.len());
    let mut pending_hyphen = false;
    for ch in collapsed.chars() {
        match ch {
            '-' => pending_hyphen = true,
            '.' => {
                pending_hyphen = false;
                if !clustered.ends_with('.') {
                    clustered.push('.');
                }
            }
            _ => {
                if pending_hyphen {
                    pending_hyphen = false;
                    if !clustered.ends_with('.') {
                        clustered.push('-');
                    }
                }
                clustered.push(ch);
            }
        }
    }

    // Lowercase for windows/unix interoperability.
    let lowered: String = clustered.chars().flat_map(char::to_lowercase).collect();
    lowered.trim_matches(['.', '-']).to_owned()
}

/// Cuts the basename to [`MAX_BASENAME_BYTES`], extension preserved.
///
/// The cut lands on a char boundary so a multi-byte character is never
/// split. A trailing-dot name ("file.") loses the dangling dot. Under
/// `beautify` the cut edge is re-trimmed: a truncation landing right after
/// a hyphen or dot would otherwise produce a `-.ext` cluster that the next
/// beautify pass collapses, breaking idempotence.
fn enforce_basename_budget(name: &str, beautify: bool) -> String {
    let (stem, extension) = split_extension(name);

    let budget = match extension {
        Some(ext) => MAX_BASENAME_BYTES.saturating_sub(ext.len() + 1),
        None => MAX_BASENAME_BYTES,
    };

    if stem.len() <= budget {
        return match extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_owned(),
        };
    }

    let mut cut = budget;
    while cut > 0 && !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    let cut_stem = if beautify {
        stem[..cut].trim_end_matches(['.', '-'])
    } else {
        &stem[..cut]
    };

    match extension {
        Some(ext) => format!("{cut_stem}.{ext}"),
        None => cut_stem.to_owned(),
    }
}

/// Splits a filename into stem and non-empty extension.
///
/// "file.tar.gz" splits at the last dot; "file" and "file." have no
/// extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(ext)),
        Some((stem, _)) => (stem, None),
        None => (name, None),
    }
}
