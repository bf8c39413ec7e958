// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

mod roundtrip_test;
mod serializer_test;
