extern crate log;
use log::warn;

pub fn log_unknown_mnemonic(mnemonic: &str) {
    warn!("No translation rule for mnemonic {}, skipping it", mnemonic);
}

pub fn log_truncated_fusion(mnemonic: &str) {
    warn!(
        "Block ended in the middle of a {} sequence, emitting wrong instruction",
        mnemonic
    );
}

pub fn log_discarded_line(token_count: usize) {
    warn!(
        "Line with {} tokens is not an instruction, dropping it",
        token_count
    );
}
