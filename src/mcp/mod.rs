//! MCP server for marmite: exposes recipes, ingredient search and the
//! shopping list via the Model Context Protocol.
//!
//! Tools: 6 recipe + 1 ingredient + 8 shopping list = 15 total.

pub mod params;

use params::*;
use crate::auth::{AuthProvider, StaticAuth};
use crate::config::Config;
use crate::nutrition::IngredientSuggestion;
use crate::MarmiteApi;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ok_text(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn err_text(msg: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg)]))
}

fn ok_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => ok_text(text),
        Err(e) => err_text(format!("failed to serialize result: {}", e)),
    }
}

/// Serialize the success value, or report the error text.
fn respond<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => ok_json(&value),
        Err(e) => err_text(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MarmiteMcpServer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MarmiteMcpServer {
    api: MarmiteApi,
    search_limit: usize,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MarmiteMcpServer {
    pub fn new(api: MarmiteApi, search_limit: usize) -> Self {
        Self {
            api,
            search_limit,
            tool_router: Self::tool_router(),
        }
    }

    // ── Recipe tools ────────────────────────────────────────────────────

    #[tool(description = "Publish a new recipe; nutrition facts are computed from its ingredients")]
    fn create_recipe(
        &self,
        Parameters(p): Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.create_recipe(p.recipe))
    }

    #[tool(description = "Get a recipe with its ingredients, steps and nutrition facts")]
    fn get_recipe(
        &self,
        Parameters(p): Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.get_recipe(&p.recipe_id))
    }

    #[tool(description = "Replace every editable field of one of your recipes")]
    fn update_recipe(
        &self,
        Parameters(p): Parameters<UpdateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.update_recipe(&p.recipe_id, p.recipe))
    }

    #[tool(description = "Change some fields of one of your recipes")]
    fn patch_recipe(
        &self,
        Parameters(p): Parameters<PatchRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.patch_recipe(&p.recipe_id, p.changes))
    }

    #[tool(description = "Delete one of your recipes")]
    fn delete_recipe(
        &self,
        Parameters(p): Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.delete_recipe(&p.recipe_id) {
            Ok(recipe) => ok_text(format!("deleted recipe {}", recipe.id)),
            Err(e) => err_text(e.to_string()),
        }
    }

    #[tool(description = "Browse recipes, newest first, filtered by name, difficulty, tag, author, time or calories")]
    fn list_recipes(
        &self,
        Parameters(p): Parameters<ListRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.api.list_recipes(&p.into_query());
        ok_json(&result)
    }

    // ── Ingredient tools ────────────────────────────────────────────────

    #[tool(description = "Suggest ingredients with nutrition per 100 g from the local catalog and Open Food Facts")]
    async fn search_ingredients(
        &self,
        Parameters(p): Parameters<SearchIngredientsParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = p.limit.unwrap_or(self.search_limit);
        let suggestions = self.api.search_ingredients(&p.query, limit).await;
        let manual = suggestions
            .is_empty()
            .then(|| IngredientSuggestion::manual(&p.query));
        ok_json(&serde_json::json!({
            "suggestions": suggestions,
            "manual": manual,
        }))
    }

    // ── Shopping list tools ─────────────────────────────────────────────

    #[tool(description = "Show your shopping list")]
    fn get_shopping_list(&self) -> Result<CallToolResult, McpError> {
        respond(self.api.shopping_list())
    }

    #[tool(description = "Add a recipe's ingredients to your shopping list, scaled by a servings multiplier")]
    fn add_recipe_to_list(
        &self,
        Parameters(p): Parameters<AddRecipeToListParams>,
    ) -> Result<CallToolResult, McpError> {
        let multiplier = p.servings_multiplier.unwrap_or(1.0);
        respond(self.api.add_recipe_to_list(&p.recipe_id, multiplier))
    }

    #[tool(description = "Take a recipe's ingredients back off your shopping list")]
    fn remove_recipe_from_list(
        &self,
        Parameters(p): Parameters<RecipeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.remove_recipe_from_list(&p.recipe_id))
    }

    #[tool(description = "Add a manual item to your shopping list")]
    fn add_list_item(
        &self,
        Parameters(p): Parameters<AddListItemParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.add_list_item(
            &p.name,
            p.quantity,
            &p.unit,
            p.ingredient_id.as_deref(),
        ))
    }

    #[tool(description = "Check or uncheck a shopping list item")]
    fn toggle_list_item(
        &self,
        Parameters(p): Parameters<ItemIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.toggle_list_item(&p.item_id))
    }

    #[tool(description = "Remove one item from your shopping list")]
    fn remove_list_item(
        &self,
        Parameters(p): Parameters<ItemIdParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.api.remove_list_item(&p.item_id))
    }

    #[tool(description = "Remove every checked item from your shopping list")]
    fn clear_checked_items(&self) -> Result<CallToolResult, McpError> {
        match self.api.clear_checked_items() {
            Ok(removed) => ok_json(&serde_json::json!({ "removed": removed })),
            Err(e) => err_text(e.to_string()),
        }
    }

    #[tool(description = "Empty your shopping list")]
    fn clear_shopping_list(&self) -> Result<CallToolResult, McpError> {
        respond(self.api.clear_shopping_list())
    }
}

#[tool_handler]
impl ServerHandler for MarmiteMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "marmite MCP server: recipes with computed nutrition, ingredient lookup and a per-user shopping list"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run_mcp_server(config: &Config) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let auth: Arc<dyn AuthProvider> = Arc::new(StaticAuth::from_option(config.user.clone()));
        let api = match MarmiteApi::open(config, auth) {
            Ok(api) => api,
            Err(e) => {
                error!("{}", e);
                return 1;
            }
        };

        let server = MarmiteMcpServer::new(api, config.search_limit);

        info!("marmite mcp server starting on stdio");

        let service = match server.serve(rmcp::transport::stdio()).await {
            Ok(s) => s,
            Err(e) => {
                error!("failed to start MCP server: {}", e);
                return 1;
            }
        };

        if let Err(e) = service.waiting().await {
            error!("MCP server error: {}", e);
            return 1;
        }

        0
    })
}
