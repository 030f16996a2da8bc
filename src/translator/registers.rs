use std::collections::HashMap;

// Scratch registers with no IA-32 counterpart.  $s7 stages pushed and
// stored immediates, $t5 stages memory operands in the arithmetic
// translators and $s6 stages the immediate factor of imull.
pub const IMMEDIATE_SCRATCH: &str = "$s7";
pub const MEMORY_SCRATCH: &str = "$t5";
pub const MULTIPLY_SCRATCH: &str = "$s6";

// Fixed IA-32 register name to MIPS register name mapping.
// Read-only for the lifetime of a translation run.
pub struct RegisterTable {
    aliases: HashMap<&'static str, &'static str>,
}

impl RegisterTable {
    pub fn new() -> RegisterTable {
        let mut aliases = HashMap::new();
        aliases.insert("%eax", "$t0");
        aliases.insert("%ecx", "$t1");
        aliases.insert("%edx", "$t2");
        aliases.insert("%ebx", "$s0");
        aliases.insert("%esi", "$s1");
        aliases.insert("%edi", "$s2");
        aliases.insert("%esp", "$sp");
        aliases.insert("%ebp", "$fp");
        RegisterTable { aliases }
    }

    pub fn alias(&self, register: &str) -> Option<&'static str> {
        self.aliases.get(register).copied()
    }
}

impl Default for RegisterTable {
    fn default() -> RegisterTable {
        RegisterTable::new()
    }
}

lazy_static! {
    pub static ref REGISTERS: RegisterTable = RegisterTable::new();
}
