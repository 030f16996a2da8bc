// Line oriented lexer for the IA-32 subset.  Each source line is
// stripped of its comment, lowercased and split into a possible label
// plus the instruction tokens; block grouping happens in the parser.

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: Option<String>,
    pub tokens: Vec<String>,
}

#[derive(Clone)]
pub struct Lexer<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            lines: source.lines(),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        let mut tokens = vec![];
        let mut words = text.split_whitespace();

        while let Some(word) = words.next() {
            let mut word = word.to_string();

            // memory operands can be split after the paren, "8( %ebp )"
            // keeps pulling words until the closing one arrives
            while word.contains('(') && !word.contains(')') {
                match words.next() {
                    Some(rest) => word += rest,
                    None => break,
                }
            }

            if word.ends_with(',') {
                word.truncate(word.len() - 1);
            }
            tokens.push(word);
        }

        tokens
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let raw = self.lines.next()?;

        let uncommented = match raw.find('#') {
            Some(pound_pos) => &raw[..pound_pos],
            None => raw,
        };
        let lowered = uncommented.to_lowercase();

        // anything before the first ':' names a new block
        let (label, rest) = match lowered.find(':') {
            Some(colon_pos) => (
                Some(lowered[..colon_pos].trim().to_string()),
                &lowered[colon_pos + 1..],
            ),
            None => (None, lowered.as_str()),
        };

        Some(Line {
            label,
            tokens: Lexer::tokenize(rest),
        })
    }
}
