pub mod admin;
pub mod articles;
pub mod auth;

use anyhow::{bail, Context, Result};
use seija_client::{ActionOutcome, AppContext, ClientConfig};
use seija_shared::forms::FieldErrors;
use serde::Serialize;

use crate::{
    cli::{Cli, Commands},
    utils,
};

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(api_base) = cli.api_base.as_deref() {
        config = config.with_api_base(api_base);
    }
    if let Some(session_dir) = cli.session_dir {
        config = config.with_session_dir(session_dir);
    }
    tracing::debug!("api base: {}", config.api_base);
    let mut app = AppContext::from_config(&config).context("failed to set up api client")?;

    match cli.command {
        Commands::Login {
            email,
            password,
        } => auth::login(&mut app, &email, &password).await,
        Commands::Register {
            username,
            email,
            password,
        } => auth::register(&mut app, &username, &email, &password).await,
        Commands::Logout => auth::logout(&mut app),
        Commands::Whoami {
            refresh,
        } => auth::whoami(&mut app, refresh).await,
        Commands::ProfileUpdate {
            username,
            email,
            avatar,
            bio,
            local,
        } => auth::profile_update(&mut app, username, email, avatar, bio, local).await,
        Commands::Articles {
            search,
            category,
            sort,
            page,
            limit,
            highlights,
        } => {
            let overrides = seija_shared::FilterOverrides {
                search,
                category,
                sort,
                page,
                limit,
            };
            articles::list(&mut app, overrides, highlights).await
        },
        Commands::Article {
            id,
        } => articles::show(&mut app, id).await,
        Commands::Like {
            id,
        } => articles::like(&mut app, id).await,
        Commands::Comment {
            id,
            content,
            reply_to,
        } => articles::comment(&mut app, id, &content, reply_to).await,
        Commands::EditComment {
            id,
            comment,
            content,
        } => articles::edit_comment(&mut app, id, comment, &content).await,
        Commands::DeleteComment {
            id,
            comment,
        } => articles::delete_comment(&mut app, id, comment).await,
        Commands::Create {
            title,
            content,
            content_file,
            category,
            excerpt,
            author,
            tags,
            featured,
            cover,
        } => {
            let body = utils::read_content(content, content_file.as_deref())?;
            let input = articles::CreateInput {
                title,
                content: body,
                category,
                excerpt,
                author,
                tags,
                featured,
                cover,
            };
            articles::create(&mut app, input).await
        },
        Commands::Update {
            id,
            title,
            content_file,
            excerpt,
            category,
            tags,
            featured,
            status,
        } => {
            let content = match content_file.as_deref() {
                Some(path) => Some(utils::read_content(None, Some(path))?),
                None => None,
            };
            let update = seija_shared::wire::ArticleUpdate {
                title,
                content,
                excerpt,
                category_name: category,
                cover_image: None,
                tags,
                featured,
                status,
            };
            articles::update(&mut app, id, update).await
        },
        Commands::Delete {
            id,
        } => articles::delete(&mut app, id).await,
        Commands::Categories => articles::categories(&mut app).await,
        Commands::CreateCategory {
            name,
            slug,
            description,
            icon,
            color,
        } => {
            let category = seija_shared::wire::NewCategory {
                name,
                slug,
                description,
                icon,
                color,
            };
            admin::create_category(&app, &category).await
        },
        Commands::Stats => admin::stats(&mut app).await,
        Commands::Upload {
            file,
        } => admin::upload(&app, &file).await,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn check_form(result: Result<(), FieldErrors>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(errors) => bail!("invalid input:\n{}", utils::describe_field_errors(&errors)),
    }
}

pub(crate) fn check_outcome(outcome: ActionOutcome, action: &str) -> Result<()> {
    match outcome {
        ActionOutcome::Done => Ok(()),
        ActionOutcome::LoginRequired => {
            bail!("please login to {action} (run `seija login`)")
        },
        ActionOutcome::Failed => bail!("failed to {action}; see the log for details"),
    }
}
