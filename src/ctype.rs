/// Membership table for a set of bytes, usable in `const` position.
pub const fn byte_set(members: &[u8]) -> [bool; 256] {
    let mut set = [false; 256];
    let mut i = 0;
    while i < members.len() {
        set[members[i] as usize] = true;
        i += 1;
    }
    set
}

const SPACE: [bool; 256] = byte_set(b" \t\n\x0b\x0c\r");
const PUNCT: [bool; 256] = byte_set(b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~");

/// C-locale `isspace`.
pub fn isspace(ch: u8) -> bool {
    SPACE[ch as usize]
}

/// Whitespace as far as inline markup boundaries care: tabs are already
/// expanded and carriage returns normalized by the time inlines run.
pub fn is_md_space(ch: u8) -> bool {
    ch == b' ' || ch == b'\n'
}

/// C-locale `ispunct`. Bytes of non-ASCII characters never count.
pub fn ispunct(ch: u8) -> bool {
    PUNCT[ch as usize]
}

pub fn isalnum(ch: u8) -> bool {
    ch.is_ascii_alphanumeric()
}

pub fn isalpha(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn isdigit(ch: u8) -> bool {
    ch.is_ascii_digit()
}
