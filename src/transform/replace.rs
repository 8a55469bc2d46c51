/// Output of a literal substitution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub bytes: Vec<u8>,
    /// Number of occurrences replaced
    pub count: usize,
}

/// Replace every non-overlapping occurrence of `find` with `replace`
///
/// Single left-to-right pass: bytes produced by a replacement are never
/// scanned again. An empty `find` leaves the input untouched.
pub fn replace_literal(haystack: &[u8], find: &[u8], replace: &[u8]) -> Replaced {
    if find.is_empty() {
        return Replaced {
            bytes: haystack.to_vec(),
            count: 0,
        };
    }

    let mut bytes = Vec::with_capacity(haystack.len());
    let mut count = 0;
    let mut rest = haystack;

    while let Some(pos) = find_subslice(rest, find) {
        bytes.extend_from_slice(&rest[..pos]);
        bytes.extend_from_slice(replace);
        rest = &rest[pos + find.len()..];
        count += 1;
    }
    bytes.extend_from_slice(rest);

    Replaced { bytes, count }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
