//! The MLS football stack: player and games tables behind a GraphQL API.

use crate::error::Result;
use crate::resources::{
    ApiKeySpec, ApiSpec, AuthenticationType, ManagedPolicy, RemovalPolicy, RoleSpec,
    ServicePrincipal, TableSpec,
};
use crate::schema::entity_schema;
use crate::stack::{Stack, StackProps};

pub const DEFAULT_STACK_ID: &str = "MlsFootballAppStack";
pub const PLAYERS_TABLE_NAME: &str = "player";
pub const GAMES_TABLE_NAME: &str = "Games";
pub const API_NAME: &str = "football-api";
pub const PLAYERS_DATA_SOURCE_NAME: &str = "PlayersDynamoDataSource";

const API_KEY_DESCRIPTION: &str = "Client key for football-api";
const ROLE_DESCRIPTION: &str = "Lets AppSync read and write the football tables";

/// Composes the football stack.
///
/// The role gets its policy before the data source captures its ARN. Both
/// tables are destroyed with the stack.
pub fn football_stack(id: &str, props: StackProps) -> Result<Stack> {
    let mut stack = Stack::new(id, props);

    let players_table =
        TableSpec::new(PLAYERS_TABLE_NAME).with_removal_policy(RemovalPolicy::Destroy);
    let games_table = TableSpec::new(GAMES_TABLE_NAME).with_removal_policy(RemovalPolicy::Destroy);

    let schema = entity_schema(&players_table);
    let players = stack.add_table("MlsFootballPlayers", players_table)?;
    let games = stack.add_table("MlsFootballGames", games_table)?;

    let api = stack.add_graphql_api(
        "FootballApi",
        ApiSpec::new(API_NAME, AuthenticationType::ApiKey),
    )?;
    let api_key = stack.add_api_key(
        "FootballApiKey",
        &api,
        ApiKeySpec::new().with_description(API_KEY_DESCRIPTION),
    )?;
    stack.add_schema("FootballSchema", &api, schema)?;

    let role = stack.add_role(
        "ItemsDynamoDBRole",
        RoleSpec::assumed_by(ServicePrincipal::appsync()).with_description(ROLE_DESCRIPTION),
    )?;
    stack.add_managed_policy(&role, ManagedPolicy::dynamodb_full_access())?;

    stack.add_dynamodb_binding(
        "PlayersDataSource",
        &api,
        PLAYERS_DATA_SOURCE_NAME,
        &players,
        &role,
    )?;

    stack.add_output("GraphQLApiUrl", api.graphql_url(), Some("GraphQL endpoint URL"))?;
    stack.add_output("GraphQLApiId", api.api_id(), None)?;
    stack.add_output("GraphQLApiKey", api_key.api_key(), Some("API key for the GraphQL endpoint"))?;
    stack.add_output("PlayersTableName", players.table_name(), None)?;
    stack.add_output("GamesTableName", games.table_name(), None)?;

    Ok(stack)
}
