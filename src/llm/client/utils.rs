//! 模型输出清理工具

/// 从模型原始输出中剥离Markdown代码块围栏，返回可供JSON解析的正文
///
/// 优先匹配```json标记的代码块，取第一个开栏与下一个闭栏之间的内容；
/// 否则匹配第一个普通代码块；两者都不存在时原样返回。
/// 结果均做首尾空白裁剪。闭栏缺失时返回开栏之后的剩余文本。
/// 本函数从不失败——返回值是否为合法JSON由调用方的解析步骤判定。
pub fn extract_json_block(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let rest = &raw[start + "```json".len()..];
        let inner = match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        };
        return inner.trim();
    }
    if let Some(start) = raw.find("```") {
        let rest = &raw[start + "```".len()..];
        let inner = match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        };
        return inner.trim();
    }
    raw.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tagged_block() {
        let raw = "Here is the result:\n```json\n{\"a\": 1}\n```\nHope it helps.";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_generic_block() {
        let raw = "```\n[1, 2, 3]\n```";
        assert_eq!(extract_json_block(raw), "[1, 2, 3]");
    }

    #[test]
    fn test_no_fence_is_identity_up_to_trim() {
        assert_eq!(extract_json_block("  {\"a\": 1}  \n"), "{\"a\": 1}");
        assert_eq!(extract_json_block("plain text"), "plain text");
    }

    #[test]
    fn test_tagged_block_preferred_over_generic() {
        let raw = "```\nnot this\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_block(raw), "{\"b\": 2}");
    }

    #[test]
    fn test_unterminated_fence_returns_remainder() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
        let raw = "```\n{\"a\": 1}";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_surrounding_prose_ignored() {
        let raw = "模型的说明文字\n```json\n  {\"queries\": []}  \n```\n更多文字";
        assert_eq!(extract_json_block(raw), "{\"queries\": []}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_json_block(""), "");
        assert_eq!(extract_json_block("   "), "");
    }
}
