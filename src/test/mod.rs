use crate::replacement_policies::{Access, AccessType};

mod components;

/// Routes the library's log output through the test harness. Safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load(set: usize, pc: u64, address: u64) -> Access {
    Access { cpu: 0, set, pc, address, access_type: AccessType::Load }
}

pub fn writeback(set: usize, address: u64) -> Access {
    Access { cpu: 0, set, pc: 0, address, access_type: AccessType::Writeback }
}
