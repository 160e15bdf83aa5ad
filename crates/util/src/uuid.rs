use rand::Rng;

const TEMPLATE: &[u8] = b"xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";
const HEX: &[u8; 16] = b"0123456789abcdef";

/// Generates a random version 4 UUID in its lowercase hyphenated form.
///
/// # Examples
///
/// ```
/// use flex_json_util::generate_uuid;
///
/// let id = generate_uuid();
/// assert_eq!(id.len(), 36);
/// assert_eq!(&id[14..15], "4");
/// ```
pub fn generate_uuid() -> String {
    generate_uuid_with(&mut rand::thread_rng())
}

/// Same as [`generate_uuid`], drawing from `rng`.
pub fn generate_uuid_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    TEMPLATE
        .iter()
        .map(|&c| match c {
            b'x' => HEX[rng.gen_range(0..16)] as char,
            // variant bits 10xx
            b'y' => HEX[rng.gen_range(8..12)] as char,
            other => other as char,
        })
        .collect()
}
