//! 评分标准与出题指令
//!
//! 每种考试类型对应一条固定的 system 指令。映射以枚举穷尽匹配的方式实现，
//! 新增类型时编译器会强制补全对应模板。

use std::fmt;
use std::str::FromStr;

/// 作文评分支持的考试类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestType {
    Ielts,
    Sat,
    Gre,
}

/// 题目生成支持的考试类型（GRE 分 Issue / Argument 两种任务）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PromptKind {
    Ielts,
    Sat,
    GreIssue,
    GreArgument,
}

/// 无法识别的考试类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTestType(pub String);

impl fmt::Display for UnknownTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown test type: {:?}", self.0)
    }
}

impl std::error::Error for UnknownTestType {}

/// 评分模板：考官开场白 + 调用方题目 + 固定的评分要求与输出格式
struct Rubric {
    preamble: &'static str,
    instructions: &'static str,
}

const IELTS_RUBRIC: Rubric = Rubric {
    preamble: "You are an IELTS examiner grading Task 2. Prompt:",
    instructions: "Check topic relevance strictly. Follow:\n\
1) Score out of 9 on:\n\
- Task Response\n\
- Coherence and Cohesion\n\
- Lexical Resource\n\
- Grammatical Range and Accuracy\n\
2) Average for Overall Band (1 decimal).\n\
3) Give brief feedback.\n\
4) Suggest 3 improvements.\n\
\n\
**Total output under 100 words. No score repetition.**\n\
\n\
Format:\n\
Task Response: <score>\n\
Coherence and Cohesion: <score>\n\
Lexical Resource: <score>\n\
Grammatical Range and Accuracy: <score>\n\
Overall Band Score: <score>\n\
\n\
Feedback:\n<paragraph>\n\
\n\
Suggestions for Improvement:\n<3 bullets>\n",
};

const SAT_RUBRIC: Rubric = Rubric {
    preamble: "You are an SAT essay scorer. Prompt:",
    instructions: "Evaluate strictly. Follow:\n\
1) Score out of 8 on:\n\
- Command of Evidence\n\
- Focus and Coherence\n\
- Style and Formal Tone\n\
- Grammar and Usage\n\
- Vocabulary & Sentence Variety\n\
2) Average for Total (1 decimal).\n\
3) Give concise feedback.\n\
4) Suggest 3 improvements.\n\
\n\
**Limit total output to 100 words. Avoid repetition.**\n\
\n\
Format:\n\
Command of Evidence: <score>\n\
Focus and Coherence: <score>\n\
Style and Formal Tone: <score>\n\
Grammar and Usage: <score>\n\
Vocabulary & Sentence Variety: <score>\n\
Total Score: <score>\n\
\n\
Feedback:\n<paragraph>\n\
\n\
Suggestions for Improvement:\n<3 bullets>\n",
};

const GRE_RUBRIC: Rubric = Rubric {
    preamble: "You are grading 2 GRE essays: Issue and Argument. Prompts:",
    instructions: "Evaluate both combined. I want only one evaluation for both essays out of 6. Follow:\n\
1) Score out of 6 on:\n\
- Clarity and Logic of Ideas\n\
- Use of Reasoning & Evidence\n\
- Organization and Coherence\n\
- Grammar and Vocabulary\n\
2) Average each essay, then average both out of 6 not 12 (1 decimal).\n\
3) Give brief combined feedback.\n\
4) Suggest 3 improvements.\n\
\n\
**Output must be ≤100 words. No repeating.**\n\
\n\
Format:\n\
Clarity and Logic of Ideas: <score>\n\
Use of Reasoning & Evidence: <score>\n\
Organization and Coherence: <score>\n\
Grammar and Vocabulary: <score>\n\
Total Score: <score>\n\
\n\
Feedback:\n<paragraph>\n\
\n\
Suggestions for Improvement:\n<3 bullets>\n",
};

impl TestType {
    pub const ALL: [TestType; 3] = [TestType::Ielts, TestType::Sat, TestType::Gre];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Ielts => "IELTS",
            TestType::Sat => "SAT",
            TestType::Gre => "GRE",
        }
    }

    fn template(&self) -> &'static Rubric {
        match self {
            TestType::Ielts => &IELTS_RUBRIC,
            TestType::Sat => &SAT_RUBRIC,
            TestType::Gre => &GRE_RUBRIC,
        }
    }

    /// 渲染评分用的 system 指令
    ///
    /// `prompt` 为考生作答的题目，允许为空，会先做 trim。
    pub fn rubric(&self, prompt: &str) -> String {
        let rubric = self.template();
        format!(
            "{}\n\n{}\n\n{}",
            rubric.preamble,
            prompt.trim(),
            rubric.instructions
        )
    }
}

impl PromptKind {
    pub const ALL: [PromptKind; 4] = [
        PromptKind::Ielts,
        PromptKind::Sat,
        PromptKind::GreIssue,
        PromptKind::GreArgument,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Ielts => "IELTS",
            PromptKind::Sat => "SAT",
            PromptKind::GreIssue => "GRE-ISSUE",
            PromptKind::GreArgument => "GRE-ARGUMENT",
        }
    }

    /// 出题用的 system 指令
    pub fn instruction(&self) -> &'static str {
        match self {
            PromptKind::Ielts => {
                "You are an expert IELTS exam writer. Give one Task 2 essay prompt only. \
                 No instructions, headings, or extra info."
            }
            PromptKind::Sat => {
                "You are an expert SAT exam writer. Give one SAT essay prompt only. \
                 No instructions, headings, or extra info."
            }
            PromptKind::GreIssue => {
                "You are an expert GRE exam writer. Give one GRE Issue Task Essay prompt only. \
                 No other text please. No instructions, headings, or extra info."
            }
            PromptKind::GreArgument => {
                "You are an expert GRE exam writer. Give one GRE Argument Essay Task prompt only. \
                 No other text please. No instructions, headings, or extra info."
            }
        }
    }
}

/// 按 trim + 大写后的名字在候选集中查找
fn lookup<T: Copy>(candidates: &[T], name: impl Fn(&T) -> &'static str, raw: &str) -> Option<T> {
    let normalized = raw.trim().to_ascii_uppercase();
    candidates.iter().copied().find(|c| name(c) == normalized)
}

impl FromStr for TestType {
    type Err = UnknownTestType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, Self::as_str, s).ok_or_else(|| UnknownTestType(s.to_string()))
    }
}

impl FromStr for PromptKind {
    type Err = UnknownTestType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&Self::ALL, Self::as_str, s).ok_or_else(|| UnknownTestType(s.to_string()))
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
