// Operand classification.  Every operand the translators accept is one
// of three shapes, sniffed from the leading character: '%' registers,
// '$' immediates and offset(%base) memory references.  Classification
// runs once here so the per-mnemonic translators can match on the
// variants instead of re-inspecting text.

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryReference {
    pub offset: String,
    pub base: String,
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Operand {
    Register(String),
    Immediate(String),
    Memory(MemoryReference),
}

impl Operand {
    pub fn classify(text: &str) -> Option<Operand> {
        let leading = text.chars().next()?;

        if leading == '%' {
            Some(Operand::Register(text.to_string()))
        } else if leading == '$' {
            // the literal keeps its textual form, sign and all
            Some(Operand::Immediate(text[1..].to_string()))
        } else if leading.is_ascii_digit() || leading == '(' {
            let open = text.find('(')?;
            let close = text.find(')')?;
            if close < open {
                return None;
            }
            Some(Operand::Memory(MemoryReference {
                // empty offset is allowed and means offset 0
                offset: text[..open].to_string(),
                base: text[open + 1..close].to_string(),
            }))
        } else {
            None
        }
    }
}
