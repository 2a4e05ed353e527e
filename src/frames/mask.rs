/// XORs the payload with the masking key, cycling every 4 bytes.
///
/// Self-inverse: applying it twice with the same key restores the input,
/// so the same routine both masks and unmasks.
pub(crate) fn mask(payload: &mut [u8], mask_key: [u8; 4]) {
    for (i, b) in payload.iter_mut().enumerate() {
        *b ^= mask_key[i % 4];
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use super::*;

    proptest! {
        #[test]
        fn mask_is_self_inverse(
            payload in vec(any::<u8>(), 0..1024),
            key in any::<[u8; 4]>(),
        ) {
            let mut masked = payload.clone();
            mask(&mut masked, key);
            mask(&mut masked, key);
            prop_assert_eq!(masked, payload);
        }

        #[test]
        fn mask_keys_cycle_every_four_bytes(
            payload in vec(any::<u8>(), 0..256),
            key in any::<[u8; 4]>(),
        ) {
            let mut masked = payload.clone();
            mask(&mut masked, key);
            for (i, (m, p)) in masked.iter().zip(&payload).enumerate() {
                prop_assert_eq!(*m, p ^ key[i % 4]);
            }
        }
    }
}
