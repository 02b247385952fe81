use rand::Rng;

/// Length of server-generated team codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 12;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh join code such as `AB12CD`.
///
/// Uniqueness is not guaranteed here; the `teams.team_code` unique index is
/// the source of truth and callers retry on collision.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_CODE_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code: surrounding whitespace dropped, uppercased.
pub fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Whether `code` is already canonical and has an acceptable shape.
pub fn is_valid(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| ALPHABET.contains(&b))
}
