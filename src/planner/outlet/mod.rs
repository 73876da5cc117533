use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::planner::context::PlannerContext;
use crate::planner::state::TravelState;

pub mod document;

pub use document::{DocumentRenderer, HtmlDocumentRenderer, classify_report};

/// 保存结果的路径
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SavedReport {
    pub markdown_path: Option<PathBuf>,
    pub document_path: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
}

/// 保存流水线产出
pub async fn save(context: &PlannerContext, state: &TravelState) -> Result<SavedReport> {
    let outlet = DiskOutlet::new(Box::new(HtmlDocumentRenderer::default()));
    outlet.save(context, state).await
}

pub trait Outlet {
    async fn save(&self, context: &PlannerContext, state: &TravelState) -> Result<SavedReport>;
}

pub struct DiskOutlet {
    renderer: Box<dyn DocumentRenderer>,
}

impl DiskOutlet {
    pub fn new(renderer: Box<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// `{origin}_to_{destination}_{YYYYmmdd_HHMMSS}`
    pub fn file_stem(state: &TravelState) -> String {
        let trip = &state.trip_request;
        format!(
            "{}_to_{}_{}",
            sanitize(&trip.origin_city),
            sanitize(&trip.destination_city),
            Local::now().format("%Y%m%d_%H%M%S")
        )
    }
}

/// 文件名中只保留字母、数字、`-` 和 `_`
fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Outlet for DiskOutlet {
    async fn save(&self, context: &PlannerContext, state: &TravelState) -> Result<SavedReport> {
        println!("\n🖊️ 报告存储中...");
        let output_dir = &context.config.output_path;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("无法创建输出目录 {}", output_dir.display()))?;

        let stem = Self::file_stem(state);
        let mut saved = SavedReport::default();

        match &state.final_report {
            Some(report) => {
                let markdown_path = output_dir.join(format!("{}.md", stem));
                fs::write(&markdown_path, report)
                    .with_context(|| format!("无法写入报告 {}", markdown_path.display()))?;
                println!("💾 已保存报告: {}", markdown_path.display());
                saved.markdown_path = Some(markdown_path);

                if context.config.render_document {
                    let document_path =
                        output_dir.join(format!("{}.{}", stem, self.renderer.extension()));
                    let title = format!(
                        "{} to {}",
                        state.trip_request.origin_city, state.trip_request.destination_city
                    );
                    self.renderer
                        .render(&title, &classify_report(report), &document_path)?;
                    println!("💾 已保存文档: {}", document_path.display());
                    saved.document_path = Some(document_path);
                }
            }
            None => eprintln!("⚠️ 警告: 未找到最终报告内容，跳过报告保存"),
        }

        if context.config.save_state {
            let state_path = output_dir.join(format!("{}_state.json", stem));
            fs::write(&state_path, serde_json::to_string_pretty(state)?)
                .with_context(|| format!("无法写入状态快照 {}", state_path.display()))?;
            println!("💾 已保存状态快照: {}", state_path.display());
            saved.state_path = Some(state_path);
        }

        println!("💾 报告保存完成，输出目录: {}", output_dir.display());
        Ok(saved)
    }
}
