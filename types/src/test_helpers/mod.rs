// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize};

pub fn assert_canonical_encode_decode<T>(t: T)
where
    T: CanonicalSerialize + CanonicalDeserialize + std::fmt::Debug + PartialEq,
{
    let bytes = aptos_bcs::to_bytes(&t).unwrap();
    let s: T = aptos_bcs::from_bytes(&bytes).unwrap();
    assert_eq!(t, s);
}
