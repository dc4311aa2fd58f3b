//! Charstring and eexec decryption.
//!
//! See "7.2 Decryption" in the Type 1 font format specification at
//! <https://adobe-type-tools.github.io/font-tech-notes/pdfs/T1_SPEC.pdf#page=63>

/// Initial cipher state for charstrings.
pub const CHARSTRING_SEED: u16 = 4330;

/// Initial cipher state for the eexec encrypted portion of a font file.
pub const EEXEC_SEED: u16 = 55665;

/// Number of random bytes at the start of an eexec section.
const EEXEC_SKIP: usize = 4;

const C1: u16 = 52845;
const C2: u16 = 22719;

/// Running state of the Type 1 stream cipher.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Cipher(u16);

impl Cipher {
    pub const fn new(seed: u16) -> Self {
        Self(seed)
    }

    /// Decrypts a single byte and advances the state.
    #[inline]
    pub fn decrypt(&mut self, cipher: u8) -> u8 {
        let plain = cipher ^ (self.0 >> 8) as u8;
        self.advance(cipher);
        plain
    }

    /// Encrypts a single byte and advances the state.
    #[inline]
    pub fn encrypt(&mut self, plain: u8) -> u8 {
        let cipher = plain ^ (self.0 >> 8) as u8;
        self.advance(cipher);
        cipher
    }

    #[inline]
    fn advance(&mut self, cipher: u8) {
        self.0 = (cipher as u16)
            .wrapping_add(self.0)
            .wrapping_mul(C1)
            .wrapping_add(C2);
    }
}

/// Returns an iterator yielding the decrypted bytes.
pub fn decrypt(bytes: impl IntoIterator<Item = u8>, seed: u16) -> impl Iterator<Item = u8> {
    let mut cipher = Cipher::new(seed);
    bytes.into_iter().map(move |b| cipher.decrypt(b))
}

/// Returns an iterator yielding the plain text of an eexec section with
/// the leading random bytes removed.
pub fn eexec_decrypt(bytes: impl IntoIterator<Item = u8>) -> impl Iterator<Item = u8> {
    decrypt(bytes, EEXEC_SEED).skip(EEXEC_SKIP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_eexec_bytes() {
        let cipher = [
            0x74, 0x3f, 0x84, 0x13, 0xf3, 0x63, 0x6c, 0xa8, 0x5a, 0x9f, 0xfe, 0xfb, 0x50, 0xb4,
            0xbb, 0x27,
        ];
        let plain = eexec_decrypt(cipher).collect::<Vec<_>>();
        assert_eq!(plain, b"dup\n/Private");
    }

    #[test]
    fn charstring_cipher_is_symmetric() {
        let plain = [0u8, 0, 0, 0, 139, 239, 13, 139, 14];
        let mut enc = Cipher::new(CHARSTRING_SEED);
        let cipher = plain.map(|b| enc.encrypt(b));
        assert_ne!(cipher, plain);
        let decrypted = decrypt(cipher, CHARSTRING_SEED).collect::<Vec<_>>();
        assert_eq!(decrypted, plain);
    }
}
