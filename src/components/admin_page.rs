use dioxus::prelude::*;
use tokio::sync::mpsc;

use crate::backend::AppCmd;
use crate::components::common::{show_tip, TipKind, TipView};
use crate::components::AppState;

#[component]
pub fn AdminComponent() -> Element {
    let mut state = use_context::<AppState>();
    let cmd_tx = use_context::<mpsc::UnboundedSender<AppCmd>>();

    let picked = state.import_file.read().clone();
    let import_gen = *state.import_gen.read();

    // The bytes are read in the browser as soon as the file is picked, so the
    // import click itself stays synchronous.
    let on_pick = move |evt: Event<FormData>| {
        let files: Vec<_> = evt.files().into_iter().collect();
        spawn(async move {
            for file_data in files {
                let filename = file_data.name();
                match file_data.read_bytes().await {
                    Ok(bytes) => state.import_file.set(Some((filename, bytes.to_vec()))),
                    Err(e) => tracing::error!("failed to read picked file: {e:?}"),
                }
            }
        });
    };

    let cmd_tx_import = cmd_tx.clone();
    let on_import = move |_| {
        match state.import_file.read().clone() {
            Some((filename, bytes)) => {
                let _ = cmd_tx_import.send(AppCmd::ImportStudents { filename, bytes });
            }
            None => show_tip(state.import_tip, "请选择Excel文件", TipKind::Error),
        }
    };

    rsx! {
        div { class: "page-container py-8",
            div { class: "page-header",
                h1 { class: "page-title", "⚙️ 管理后台" }
            }

            div { class: "panel",
                h2 { class: "panel-title", "导入学生名单" }
                p { class: "form-hint", "上传Excel文件（第一列学号，第二列姓名）" }
                div { class: "form-group",
                    // Keyed on the import generation: a successful import
                    // remounts the input, so the browser forgets the
                    // consumed file.
                    for gen in [import_gen] {
                        input {
                            key: "{gen}",
                            class: "input",
                            "type": "file",
                            accept: ".xlsx,.xls",
                            onchange: on_pick
                        }
                    }
                }
                if let Some((filename, _)) = picked {
                    p { class: "form-hint", "已选择：{filename}" }
                }
                button { class: "btn btn-primary", onclick: on_import, "导入" }
                TipView { slot: state.import_tip }
            }
        }
    }
}
