// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

mod argument_test;
mod local_account_test;
mod transaction_builder_test;
