//! Sample payloads shared by the integration tests.

/// Text payload with phrases repeated at a distance.
pub const BELLS: &[u8] = b"for.whom.the.bell.tolls,.the.bell.tolls.for.thee!";

/// Protocol-message-like text of `size` bytes, repeating every few dozen bytes.
pub fn text_payload(size: usize) -> Vec<u8> {
    let phrases = [
        b"Session started for user Administrator on server DESKTOP-ABC1234 ".as_slice(),
        b"Channel joined: rdpdr cliprdr rdpsnd drdynvc ",
        b"Bitmap update received for region (0,0)-(1920,1080) compressed=true ",
    ];

    phrases.iter().copied().cycle().flatten().copied().take(size).collect()
}

/// 32-bit pixels in runs of four colors per 256-byte scanline.
pub fn bitmap_payload(size: usize) -> Vec<u8> {
    const COLORS: [[u8; 4]; 4] = [
        [30, 60, 120, 255],
        [240, 240, 240, 255],
        [0, 0, 0, 255],
        [240, 240, 240, 255],
    ];

    (0..size).map(|i| COLORS[(i % 256) / 64][i % 4]).collect()
}

/// Deterministic pseudo-random bytes (xorshift32), which MPPC cannot shrink.
pub fn noise_payload(size: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;

    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state.to_le_bytes()[0]
        })
        .collect()
}
