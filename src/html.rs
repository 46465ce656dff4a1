//! HTML report cards and batch export.

use crate::config::ReportConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::render::{RenderModel, ReportCard, render};
use handlebars::Handlebars;
use serde::Serialize;

const REPORT_TEMPLATE: &str = r#"<div class="report-card">
  <div class="report-header">
    <h1 class="report-main-title">{{card.header.title}}</h1>
    <h2 class="report-sub-title">{{card.header.subtitle}}</h2>
    <div class="report-year">{{card.header.period}}</div>
    <div class="report-generated">生成时间：{{generated_at}}</div>
  </div>
  <div class="student-basic-info">
    {{#if card.identity.show_school}}
    <div class="info-row"><span class="info-label">学校(盖章):</span><span class="info-value underline">{{card.identity.school}}</span></div>
    {{/if}}
    <div class="info-row">
      <span class="info-label">班级:</span><span class="info-value underline">{{card.identity.class}}</span>
      <span class="info-label">姓名:</span><span class="info-value underline">{{card.identity.name}}</span>
      {{#if card.identity.show_id_card}}
      <span class="info-label">身份证号:</span><span class="info-value underline">{{card.identity.id_card}}</span>
      {{/if}}
    </div>
  </div>
  <div class="scores-section">
    <h3 class="section-title">各科成绩详情</h3>
    <table class="scores-table">
      <thead><tr><th>科目</th><th>成绩</th><th>等级</th><th>进度条</th></tr></thead>
      <tbody>
        {{#each card.subjects}}
        <tr>
          <td>{{subject}}</td>
          <td>{{display}}</td>
          <td>{{grade}}</td>
          <td><div class="bar"><div class="bar-fill" style="background: {{color}}; width: {{bar_width}}%;"></div></div></td>
        </tr>
        {{/each}}
      </tbody>
    </table>
  </div>
  <div class="evaluation-section">
    <h3 class="evaluation-title">综合素质评价</h3>
    <table class="evaluation-table">
      <thead><tr><th>序号</th><th>评价项目</th><th>评价结果</th><th>考试成绩</th></tr></thead>
      <tbody>
        {{#each card.evaluation}}
        <tr><td>{{number}}</td><td>{{item}}</td><td>{{result}}</td><td>{{score}}</td></tr>
        {{/each}}
      </tbody>
    </table>
  </div>
  <div class="summary-section">
    <div class="summary-item"><div class="summary-label">总分</div><div class="summary-value">{{total_score}}</div></div>
    <div class="summary-item"><div class="summary-label">平均分</div><div class="summary-value">{{card.summary.average_score}}</div></div>
    <div class="summary-item"><div class="summary-label">班级排名</div><div class="summary-value">{{card.summary.rank}}</div></div>
    <div class="summary-item"><div class="summary-label">总人数</div><div class="summary-value">{{card.summary.total_students}}</div></div>
    <div class="summary-item"><div class="summary-label">科目数量</div><div class="summary-value">{{card.summary.subject_count}}</div></div>
    <div class="summary-item"><div class="summary-label">整体评级</div><div class="summary-value" style="color: {{card.summary.overall_color}};">{{card.summary.overall_grade}}</div></div>
  </div>
  <div class="teacher-message">
    <h3 class="section-title">班主任寄语：</h3>
    <div class="message-content">{{card.comments.teacher_message}}</div>
  </div>
  <div class="comment-section">
    <h3 class="section-title">教师评语</h3>
    <div class="comment-text">{{#each comment_lines}}<p>{{this}}</p>{{/each}}</div>
  </div>
  <div class="awards-section">
    <h3 class="section-title">获奖情况：</h3>
    <div class="awards-content">{{#each card.comments.awards}}<div class="award-name">{{this}}</div>{{/each}}</div>
  </div>
  <div class="message-section">
    <h3 class="section-title">寄语：</h3>
    <div class="message-content">{{card.comments.message}}</div>
  </div>
  <div class="parent-message">
    <h3 class="section-title">家长建议及意见：</h3>
    <div class="parent-info"><span>家长签名：</span><span class="info-gap"></span><span>下学期报名：</span><span class="info-gap"></span><span>年</span><span class="info-gap"></span><span>月</span><span class="info-gap"></span><span>日</span></div>
  </div>
  <div class="signature-section">
    <span>校长：{{card.signatures.principal}}</span>
    <span>教务主任：{{card.signatures.director}}</span>
    <span>班主任：{{card.signatures.class_teacher}}</span>
  </div>
</div>
"#;

const NO_SUBJECT_TEMPLATE: &str = r#"<div class="report-card report-error">
  <h3>错误：没有找到{{name}}的科目成绩数据</h3>
</div>
"#;

#[derive(Serialize)]
struct ReportView<'a> {
    card: &'a ReportCard,
    total_score: String,
    comment_lines: Vec<&'a str>,
    generated_at: &'a str,
}

#[derive(Serialize)]
struct NoSubjectView<'a> {
    name: &'a str,
}

/// One rendered report of a batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedReport {
    pub index: usize,
    pub name: String,
    pub student_id: String,
    pub class: String,
    pub html: String,
}

/// Result of rendering a whole dataset. A record that fails to render is left
/// out of `reports` and described in `warnings`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExport {
    pub total_reports: usize,
    pub reports: Vec<ExportedReport>,
    pub warnings: Vec<String>,
}

/// Renders report models to standalone HTML fragments.
pub struct HtmlRenderer {
    registry: Handlebars<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_template_string("report", REPORT_TEMPLATE)?;
        registry.register_template_string("no_subject", NO_SUBJECT_TEMPLATE)?;
        Ok(HtmlRenderer { registry })
    }

    /// Render with the current local time as the generation stamp.
    pub fn render(&self, model: &RenderModel) -> Result<String> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.render_at(model, &now)
    }

    pub fn render_at(&self, model: &RenderModel, generated_at: &str) -> Result<String> {
        let html = match model {
            RenderModel::Report(card) => {
                let view = ReportView {
                    card,
                    total_score: card.summary.total_score.to_string(),
                    comment_lines: card.comments.comment.lines().collect(),
                    generated_at,
                };
                self.registry.render("report", &view)?
            }
            RenderModel::NoSubjectData { name } => self
                .registry
                .render("no_subject", &NoSubjectView { name })?,
        };
        Ok(html)
    }

    /// Render every record of `dataset`, isolating per-record failures.
    ///
    /// # Arguments
    /// * `dataset` - The ranked batch to export
    /// * `config` - Report settings applied to every card
    ///
    /// # Returns
    /// * `BatchExport` - One report per record that rendered, plus a warning for
    ///   each record that did not
    pub fn export_all(&self, dataset: &Dataset, config: &ReportConfig) -> BatchExport {
        let mut batch = BatchExport::default();

        for (index, student) in dataset.students().iter().enumerate() {
            let model = render(student, dataset.len(), config);
            match self.render(&model) {
                Ok(html) => batch.reports.push(ExportedReport {
                    index,
                    name: student.name().to_string(),
                    student_id: student.student_id().unwrap_or_default().to_string(),
                    class: student.class().unwrap_or_default().to_string(),
                    html,
                }),
                Err(e) => {
                    log::warn!("report for '{}' failed: {}", student.name(), e);
                    batch
                        .warnings
                        .push(format!("{} ({}): {}", student.name(), index, e));
                }
            }
        }

        batch.total_reports = batch.reports.len();
        batch
    }
}
