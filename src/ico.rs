//! Windows `.ico` container holding PNG-compressed images.

const ICONDIR_LEN: usize = 6;
const ENTRY_LEN: usize = 16;

/// Packs `(size, png)` pairs into an icon file. Entries keep the given
/// order. Sizes must be 1..=256.
pub fn pack(images: &[(u32, Vec<u8>)]) -> anyhow::Result<Vec<u8>> {
    if images.is_empty() {
        anyhow::bail!("an icon file needs at least one image");
    }
    let count = u16::try_from(images.len())?;

    let mut bytes = Vec::with_capacity(
        ICONDIR_LEN + ENTRY_LEN * images.len() + images.iter().map(|(_, png)| png.len()).sum::<usize>(),
    );
    bytes.extend(0u16.to_le_bytes());
    bytes.extend(1u16.to_le_bytes());
    bytes.extend(count.to_le_bytes());

    let mut offset = ICONDIR_LEN + ENTRY_LEN * images.len();
    for (size, png) in images {
        // 256 is stored as 0
        let dimension = match *size {
            1..=255 => *size as u8,
            256 => 0,
            s => anyhow::bail!("icon entries are 1 to 256 px, got {s}"),
        };
        bytes.extend([dimension, dimension, 0, 0]);
        bytes.extend(1u16.to_le_bytes());
        bytes.extend(32u16.to_le_bytes());
        bytes.extend(u32::try_from(png.len())?.to_le_bytes());
        bytes.extend(u32::try_from(offset)?.to_le_bytes());
        offset += png.len();
    }
    for (_, png) in images {
        bytes.extend_from_slice(png);
    }
    log::debug!("packed {} images into {} byte icon", images.len(), bytes.len());
    Ok(bytes)
}
