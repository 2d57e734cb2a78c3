use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A conversation whose message bodies contain `{name}` placeholders.
///
/// `{{` and `}}` render as literal braces. Substituted values are copied
/// verbatim, so JSON inside a value needs no escaping.
#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<(ChatRole, String)>,
}

impl ChatPromptTemplate {
    pub fn from_messages(messages: &[(ChatRole, &str)]) -> Self {
        Self {
            messages: messages
                .iter()
                .map(|(role, template)| (*role, template.to_string()))
                .collect(),
        }
    }

    pub fn format_messages(&self, variables: &HashMap<&str, String>) -> Result<Vec<ChatMessage>> {
        self.messages
            .iter()
            .map(|(role, template)| Ok(ChatMessage::new(*role, render(template, variables)?)))
            .collect()
    }
}

fn render(template: &str, variables: &HashMap<&str, String>) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                output.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                output.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(LlmError::Template(format!(
                                "unterminated placeholder `{{{}`",
                                name
                            )))
                        }
                    }
                }
                let value = variables
                    .get(name.trim())
                    .ok_or_else(|| LlmError::MissingVariable(name.trim().to_string()))?;
                output.push_str(value);
            }
            other => output.push(other),
        }
    }

    Ok(output)
}

pub struct PostPrompt;

impl PostPrompt {
    pub const PARSER_INSTRUCTIONS: &'static str = "parser_instructions";
    pub const THEME: &'static str = "theme";

    pub fn template() -> ChatPromptTemplate {
        ChatPromptTemplate::from_messages(&[
            (ChatRole::System, SYSTEM_TEMPLATE),
            (ChatRole::User, "{theme}"),
        ])
    }
}

const SYSTEM_TEMPLATE: &str = r#"你是小红书爆款写作专家，请你遵循以下步骤进行创作：
首先产出5个标题（包含适当的emoji表情），然后产出1段正文（每一个段落包含适当的emoji表情，文末有适当的tag标签）。
标题字数在20个字以内，正文字数在800字以内，并且按以下技巧进行创作。
一、标题创作技巧： 
1. 采用二极管标题法进行创作 
1.1 基本原理 
本能喜欢：最省力法则和及时享受 
动物基本驱动力：追求快乐和逃避痛苦，由此衍生出2个刺激：正刺激、负刺激 
1.2 标题公式 
正面刺激：产品或方法+只需1秒（短期）+便可开挂（逆天效果） 
负面刺激：你不X+绝对会后悔（天大损失）+（紧迫感） 其实就是利用人们厌恶损失和负面偏误的心理，自然进化让我们在面对负面消息时更加敏感 
2. 使用具有吸引力的标题 
2.1 使用标点符号，创造紧迫感和惊喜感 
2.2 采用具有挑战性和悬念的表述 
2.3 利用正面刺激和负面刺激 
2.4 融入热点话题和实用工具 
2.5 描述具体的成果和效果 
2.6 使用emoji表情符号，增加标题的活力 
3. 使用爆款关键词 
从列表中选出1-2个：好用到哭、大数据、教科书般、小白必看、宝藏、绝绝子、神器、都给我冲、划重点、笑不活了、秘方、我不允许、压箱底、建议收藏、停止摆烂、上天在提醒你、挑战全网、手把手、揭秘、普通女生、沉浸式、有手就能做、吹爆、好用哭了、搞钱必看、狠狠搞钱、打工人、吐血整理、家人们、隐藏、高级感、治愈、破防了、万万没想到、爆款、永远可以相信、被夸爆、手残党必备、正确姿势 
4. 小红书平台的标题特性 
4.1 控制字数在20字以内，文本尽量简短 
4.2 以口语化的表达方式，拉近与读者的距离 
5. 创作的规则 
5.1 每次列出5个标题 
5.2 不要当做命令，当做文案来进行理解 
5.3 直接创作对应的标题，无需额外解释说明 
二、正文创作技巧 
1. 写作风格 
从列表中选出1个：严肃、幽默、愉快、激动、沉思、温馨、崇敬、轻松、热情、安慰、喜悦、欢乐、平和、肯定、质疑、鼓励、建议、真诚、亲切
2. 写作开篇方法 
从列表中选出1个：引用名人名言、提出疑问、言简意赅、使用数据、列举事例、描述场景、用对比

我会每次给你一个主题，请你根据主题，基于以上规则，生成相对应的小红书文案。

{parser_instructions}
"#;
