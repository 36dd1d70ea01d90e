use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;

use math_worksheet::models::load_curriculum_or_empty;
use math_worksheet::utils::logging;
use math_worksheet::{
    AssessmentFlow, Config, LessonFlow, LessonRequest, OpenAiGenerator, TextGenerator,
};

const USAGE: &str = "用法:
  math-worksheet generate <grade> <semester> [subject]
  math-worksheet grade <materials_file> <responses_file>";

/// 命令行子命令
enum Command {
    Generate {
        grade: u32,
        semester: u32,
        subject: Option<String>,
    },
    Grade {
        materials_file: String,
        responses_file: String,
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        match args {
            [mode, grade, semester, rest @ ..] if mode == "generate" && rest.len() <= 1 => {
                Ok(Command::Generate {
                    grade: grade.parse().with_context(|| format!("无效的学年: {}", grade))?,
                    semester: semester
                        .parse()
                        .with_context(|| format!("无效的学期: {}", semester))?,
                    subject: rest.first().cloned(),
                })
            }
            [mode, materials_file, responses_file] if mode == "grade" => Ok(Command::Grade {
                materials_file: materials_file.clone(),
                responses_file: responses_file.clone(),
            }),
            _ => bail!("参数错误\n{}", USAGE),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Generate { .. } => "generate",
            Command::Grade { .. } => "grade",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    // 加载配置
    let config = Config::from_env();
    config.validate()?;

    let generator = OpenAiGenerator::new(&config);
    logging::log_startup(command.name(), generator.model_name());
    let generator: Arc<dyn TextGenerator> = Arc::new(generator);

    match command {
        Command::Generate {
            grade,
            semester,
            subject,
        } => {
            let curriculum = load_curriculum_or_empty(Path::new(&config.curriculum_path)).await;
            let flow = LessonFlow::new(generator, None, curriculum, &config);
            let materials = flow
                .run(&LessonRequest {
                    grade,
                    semester,
                    subject,
                    extra_request: None,
                })
                .await?;

            println!("{}", materials.lesson);
            println!("\n{}\n", "=".repeat(60));
            println!("{}", materials.materials_text);
        }
        Command::Grade {
            materials_file,
            responses_file,
        } => {
            let materials_text = tokio::fs::read_to_string(&materials_file)
                .await
                .with_context(|| format!("读取教材文件失败: {}", materials_file))?;
            let responses_text = tokio::fs::read_to_string(&responses_file)
                .await
                .with_context(|| format!("读取作答文件失败: {}", responses_file))?;

            let flow = AssessmentFlow::new(generator, &config);
            let result = flow.run(&materials_text, &responses_text).await?;

            print!("{}", result.rendered);
        }
    }

    Ok(())
}
