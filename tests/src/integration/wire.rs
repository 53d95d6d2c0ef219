//! # Wire Compatibility
//!
//! Pinned vectors for hashes, derived addresses and frame bytes. Any change
//! here moves deployed child records to new addresses or breaks clients.

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use shared_cells::{deserialize_boc, serialize_boc, Cell, CellBuilder};
    use source_registry::prelude::*;
    use std::sync::Arc;

    const HASH: &str = "E5ny0LU1Q9ESmmVUNa8uFOyuN3JDbvHgsURxUtdETnI=";

    fn child_code() -> ArcCell {
        let mut b = CellBuilder::new();
        b.store_bytes(b"source-item").unwrap();
        Arc::new(b.build().unwrap())
    }

    #[test]
    fn test_empty_cell_hash() {
        assert_eq!(
            hex::encode(Cell::empty().repr_hash()),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn test_key_vectors() {
        let key = derive_source_key("my verifier", HASH).unwrap();
        assert_eq!(
            key.verifier.to_string(),
            "f192be7287d1e13824c114887e2921a3ed12883dc48ed4611c929c7208a0029b"
        );
        assert_eq!(
            key.content.to_string(),
            "1399f2d0b53543d1129a655435af2e14ecae3772436ef1e0b1447152d7444e72"
        );
        assert_eq!(STANDARD.encode(key.content.as_bytes()), HASH);
    }

    #[test]
    fn test_child_address_vector() {
        let key = derive_source_key("my verifier", HASH).unwrap();
        let registry = MsgAddress::new(0, [0xC0; 32]);
        let address = derive_child_address(&key, &registry, &child_code()).unwrap();
        assert_eq!(
            address.to_string(),
            "0:c3e533214952f79eb3cf436b5e4c90f3c728bff3c3f99cb67a887ac999aa4f8a"
        );
    }

    #[test]
    fn test_change_admin_frame_bytes() {
        let message = RegistryMessage::new(
            1,
            RegistryOperation::ChangeAdmin(MsgAddress::new(0, [0u8; 32])),
        );
        let bytes = message.to_boc().unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "b5ee9c7201010101003000005b00000bbc0000000000000001800000000000000000\
             00000000000000000000000000000000000000000000000010"
        );
        assert_eq!(RegistryMessage::from_boc(&bytes).unwrap(), message);
    }

    #[test]
    fn test_deploy_frame_shape() {
        let message =
            RegistryMessage::deploy_source(42, "my verifier", HASH, b"https://x/y.json").unwrap();
        let root = deserialize_boc(&message.to_boc().unwrap()).unwrap();
        assert_eq!(root.bit_len(), 32 + 64 + 256 + 256);
        assert_eq!(root.refs().len(), 1);
        assert_eq!(&root.data()[..4], &1002u32.to_be_bytes());
        assert_eq!(root.refs()[0].data(), b"https://x/y.json");
    }

    #[test]
    fn test_registry_state_survives_bag_of_cells() {
        let state = RegistryState {
            admin: MsgAddress::new(0, [1u8; 32]),
            verifier_source: MsgAddress::new(-1, [2u8; 32]),
            min_fee: "0.065".parse().unwrap(),
            max_fee: "1".parse().unwrap(),
            child_code: child_code(),
        };
        let bytes = serialize_boc(&Arc::new(state.to_cell().unwrap()));
        let root = deserialize_boc(&bytes).unwrap();
        assert_eq!(RegistryState::from_cell(&root).unwrap(), state);
    }

    #[test]
    fn test_every_opcode_value() {
        assert_eq!(opcodes::DEPLOY_SOURCE, 1002);
        assert_eq!(opcodes::CHANGE_VERIFIER_SOURCE, 2003);
        assert_eq!(opcodes::CHANGE_ADMIN, 3004);
        assert_eq!(opcodes::SET_CHILD_CODE, 4005);
        assert_eq!(opcodes::REPLACE_REGISTRY_CODE, 5006);
        assert_eq!(opcodes::SET_FEE_BOUNDS, 6007);
    }
}
