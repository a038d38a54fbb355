//! Category command handlers.

use crate::api::{self, Mode};
use crate::args::InsertCategoryArgs;
use crate::commands::{listing, Out};
use crate::model::{category_style, Category, NewCategory};
use crate::{Config, Result};
use anyhow::{bail, Context};

/// Lists every category ordered by name.
pub async fn list_categories(config: &Config, mode: Mode) -> Result<Out<Vec<Category>>> {
    let mut backend = api::backend(config, mode).await?;
    let categories = backend
        .list_categories()
        .await
        .context("Unable to fetch categories")?;
    let message = listing(
        &format!("{} categories:", categories.len()),
        categories
            .iter()
            .map(|c| format!("{:<16} {:<8} {}  ({})", c.name, c.kind, c.color, c.id)),
    );
    Ok(Out::new(message, categories))
}

/// Creates a category. Without an explicit color the built-in color for its name is used.
///
/// # Errors
/// - Returns an error if the name is empty or a category with the same name already exists.
pub async fn insert_category(
    config: &Config,
    mode: Mode,
    args: &InsertCategoryArgs,
) -> Result<Out<Category>> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("The category name must not be empty");
    }
    let mut backend = api::backend(config, mode).await?;
    let existing = backend.list_categories().await?;
    if existing.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
        bail!("A category named '{name}' already exists");
    }
    let new = NewCategory {
        name: name.to_string(),
        kind: args.kind,
        color: args
            .color
            .clone()
            .unwrap_or_else(|| category_style(name).color.to_string()),
        icon: args.icon.clone(),
    };
    let created = backend
        .create_category(&new)
        .await
        .context("Unable to create the category")?;
    Ok(Out::new(
        format!("Created category {} ({})", created.name, created.id),
        created,
    ))
}

/// Deletes the category with `id`.
pub async fn delete_category(config: &Config, mode: Mode, id: &str) -> Result<Out<String>> {
    let mut backend = api::backend(config, mode).await?;
    backend
        .delete_category(id)
        .await
        .with_context(|| format!("Unable to delete category '{id}'"))?;
    Ok(Out::new(format!("Deleted category {id}"), id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryKind;
    use crate::test::TestEnv;

    fn insert_args(name: &str, color: Option<&str>) -> InsertCategoryArgs {
        InsertCategoryArgs {
            name: name.to_string(),
            kind: CategoryKind::Both,
            color: color.map(str::to_string),
            icon: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let env = TestEnv::new().await;
        let config = env.config();
        let out = insert_category(&config, Mode::Test, &insert_args("Educação", None))
            .await
            .unwrap();
        let created = out.structure().unwrap();
        assert_eq!(created.color, "#64748b");
        assert_eq!(created.kind, CategoryKind::Both);

        let listed = list_categories(&config, Mode::Test).await.unwrap();
        let names: Vec<&str> = listed
            .structure()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Alimentação", "Educação", "Lazer", "Moradia", "Renda", "Transporte"]
        );
    }

    #[tokio::test]
    async fn test_insert_uses_builtin_or_given_color() {
        let env = TestEnv::new().await;
        let config = env.config();
        delete_category(&config, Mode::Test, "cat-02").await.unwrap();
        let out = insert_category(&config, Mode::Test, &insert_args("Lazer", None))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().color, "#f97316");
        let out = insert_category(&config, Mode::Test, &insert_args("Pets", Some("#000000")))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().color, "#000000");
    }

    #[tokio::test]
    async fn test_insert_duplicate_or_empty() {
        let env = TestEnv::new().await;
        let config = env.config();
        assert!(insert_category(&config, Mode::Test, &insert_args("moradia", None))
            .await
            .is_err());
        assert!(insert_category(&config, Mode::Test, &insert_args(" ", None))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let env = TestEnv::new().await;
        assert!(delete_category(&env.config(), Mode::Test, "nope")
            .await
            .is_err());
    }
}
