// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

mod identifier_test;
mod language_storage_test;
mod transaction_test;
