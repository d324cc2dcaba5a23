//! CRC-16/XMODEM as used by MacBinary II and III headers

const POLYNOMIAL: u16 = 0x1021;

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Lookup table indexed by the top byte of the running CRC
pub static CRC_TABLE: [u16; 256] = build_table();

/// Continue a CRC over `data`
pub fn crc16_update(mut crc: u16, data: &[u8]) -> u16 {
    for &byte in data {
        crc = (crc << 8) ^ CRC_TABLE[usize::from((crc >> 8) ^ u16::from(byte))];
    }
    crc
}

/// CRC of `data` starting from zero
pub fn crc16(data: &[u8]) -> u16 {
    crc16_update(0, data)
}
