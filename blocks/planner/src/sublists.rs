use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response};
use todo_atoms::arrange::{arrange, Group, SortKey};
use todo_atoms::respond;
use todo_atoms::sublists::{self, SubList, SubListItem};

pub fn item_groups(sublist: SubList, sort_key: SortKey) -> Vec<Group<SubListItem>> {
    arrange(sublist.items, sort_key)
}

/// GET /sublists/{id}/items
pub async fn list_items(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    sort_key: SortKey,
) -> Result<Response<Body>, Error> {
    respond::respond(
        sublists::service::get_sublist(client, table_name, sublist_id).await,
        |sublist| respond::ok(&item_groups(sublist, sort_key)),
    )
}
