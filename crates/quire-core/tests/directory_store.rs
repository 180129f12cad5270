use std::sync::Arc;
use std::time::Duration;

use quire_core::render::text;
use quire_core::{DirectorySource, EmbedError, MemoRenderer, MemoStore, RenderNode, RenderOptions};
use tempfile::TempDir;

fn write_memo(dir: &TempDir, uid: &str, raw: &str) {
    std::fs::write(dir.path().join(format!("{uid}.md")), raw).unwrap();
}

fn renderer_for(dir: &TempDir) -> MemoRenderer {
    let source = DirectorySource::new(dir.path()).with_snippet_length(10);
    let store = MemoStore::new(Arc::new(source)).with_fetch_timeout(Some(Duration::from_secs(5)));
    MemoRenderer::new(Arc::new(store), RenderOptions::default())
}

#[tokio::test]
async fn renders_embeds_from_markdown_files() {
    let dir = TempDir::new().unwrap();
    write_memo(
        &dir,
        "root",
        "---\ndisplay_time: 2024-05-01T09:30:00Z\n---\n# Notes\n![[memos/child]]\n![[memos/child?snippet&inline]]",
    );
    write_memo(
        &dir,
        "child",
        "---\ndisplay_time: 2024-04-30T08:00:00Z\nresources:\n  - name: resources/3\n    filename: plan.pdf\n    type: application/pdf\n---\nchild body that is long",
    );

    let tree = renderer_for(&dir).render("root").await;

    assert!(tree.errors().is_empty());
    let out = text::to_text(&tree);
    assert!(out.contains("# Notes\n"));
    assert!(out.contains("┌ 2024-04-30 08:00 · child · /m/child\n"));
    assert!(out.contains("│ child body that is long\n"));
    assert!(out.contains("│ [file] plan.pdf </file/resources/3/plan.pdf>\n"));
    assert!(out.contains("\nchild body...\n"));
}

#[tokio::test]
async fn missing_file_and_cycle_render_as_errors() {
    let dir = TempDir::new().unwrap();
    write_memo(&dir, "a", "![[memos/b]]\n![[memos/gone]]");
    write_memo(&dir, "b", "![[memos/a]]");

    let tree = renderer_for(&dir).render("a").await;

    assert_eq!(
        tree.errors(),
        vec![
            &EmbedError::NestedRendering("memos/a".to_string()),
            &EmbedError::NotFound("gone".to_string()),
        ]
    );
}

#[tokio::test]
async fn malformed_frontmatter_renders_not_found() {
    let dir = TempDir::new().unwrap();
    write_memo(&dir, "a", "![[memos/bad]]");
    write_memo(&dir, "bad", "---\ndisplay_time: [not a time\n---\nbody");

    let tree = renderer_for(&dir).render("a").await;

    let RenderNode::Document { children, .. } = &tree else {
        panic!("expected document");
    };
    assert_eq!(
        children,
        &vec![RenderNode::error(EmbedError::NotFound("bad".to_string()))]
    );
}
