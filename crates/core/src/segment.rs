//! Sentence segmentation for mixed CJK and Latin text.

/// Terminal marks that always end a sentence.
const HARD_TERMINATORS: &[char] = &['。', '！', '？', '；', '!', '?'];

/// Latin full stop; only a terminator when followed by whitespace or the end.
const FULL_STOP: char = '.';

fn is_terminator(c: char) -> bool {
    HARD_TERMINATORS.contains(&c) || c == FULL_STOP
}

/// Split a block of text into sentences, keeping each terminal mark with the
/// sentence it ends.
///
/// Consecutive terminal marks (`?!`, `。。`) stay together. A Latin `.` only
/// ends a sentence before whitespace or the end of the text, so decimals and
/// abbreviations such as `3.5` and `e.g` survive. Text without any terminal
/// mark comes back as a single sentence; empty input yields an empty vec.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut idx = 0;

    while idx < chars.len() {
        let c = chars[idx];
        current.push(c);
        idx += 1;

        let ends_sentence = if c == FULL_STOP {
            chars
                .get(idx)
                .map_or(true, |next| next.is_whitespace() || is_terminator(*next))
        } else {
            HARD_TERMINATORS.contains(&c)
        };

        if !ends_sentence {
            continue;
        }

        // Keep trailing terminal marks with this sentence.
        while let Some(&next) = chars.get(idx) {
            if !is_terminator(next) {
                break;
            }
            current.push(next);
            idx += 1;
        }

        push_sentence(&mut sentences, &mut current);
    }
    push_sentence(&mut sentences, &mut current);

    if sentences.is_empty() {
        sentences.push(text.to_string());
    }
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_split_cjk() {
        let sentences = split_sentences("算力是基础。模型是核心！生态呢？还有部署；收尾");
        assert_eq!(
            sentences,
            vec!["算力是基础。", "模型是核心！", "生态呢？", "还有部署；", "收尾"]
        );
    }

    #[test]
    fn test_split_latin() {
        let sentences = split_sentences("GPUs matter. Models matter too! Why? Because.");
        assert_eq!(
            sentences,
            vec!["GPUs matter.", "Models matter too!", "Why?", "Because."]
        );
    }

    #[test]
    fn test_decimal_point_does_not_split() {
        let sentences = split_sentences("Version 3.5 shipped. Next is 4.0");
        assert_eq!(sentences, vec!["Version 3.5 shipped.", "Next is 4.0"]);
    }

    #[test]
    fn test_terminator_runs_stay_together() {
        let sentences = split_sentences("真的吗？！是的。。好");
        assert_eq!(sentences, vec!["真的吗？！", "是的。。", "好"]);

        let sentences = split_sentences("Really?! Yes...");
        assert_eq!(sentences, vec!["Really?!", "Yes..."]);
    }

    #[test]
    fn test_no_terminator_returns_whole_block() {
        assert_eq!(split_sentences("  没有标点的句子  "), vec!["没有标点的句子"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_only_punctuation() {
        assert_eq!(split_sentences("。"), vec!["。"]);
    }

    #[test]
    fn test_coverage_preserves_content() {
        let samples = [
            "第一句。第二句！ Third one? fourth.",
            "a.b.c. d",
            "；；开头就是分号",
            "no punctuation at all",
        ];

        for sample in samples {
            let sentences = split_sentences(sample);
            assert!(!sentences.is_empty());
            assert_eq!(non_whitespace(&sentences.concat()), non_whitespace(sample));
        }
    }
}
