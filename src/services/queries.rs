//! GraphQL documents sent by the services.

macro_rules! product_fields {
    () => {
        r"
        id
        title
        handle
        vendor
        productType
        status
        description
        tags
        featuredImage { url }
        media(first: 20) {
            edges { node { ... on MediaImage { image { url } } } }
        }
        variants(first: 100) {
            edges {
                node {
                    id
                    title
                    sku
                    barcode
                    price
                    inventoryQuantity
                    image { url }
                    inventoryItem {
                        id
                        measurement { weight { unit value } }
                    }
                }
            }
        }
        "
    };
}

macro_rules! fulfillment_order_fields {
    () => {
        r"
        id
        status
        assignedLocation {
            name
            location { id }
        }
        "
    };
}

pub const ORDER_FULFILLMENT_ORDERS: &str = concat!(
    r"
    query OrderFulfillmentOrders($id: ID!) {
        order(id: $id) {
            fulfillmentOrders(first: 50) {
                edges { node {",
    fulfillment_order_fields!(),
    r"} }
            }
        }
    }
    "
);

pub const FULFILLMENT_ORDER_MOVE: &str = concat!(
    r"
    mutation FulfillmentOrderMove($id: ID!, $newLocationId: ID!) {
        fulfillmentOrderMove(id: $id, newLocationId: $newLocationId) {
            movedFulfillmentOrder {",
    fulfillment_order_fields!(),
    r"}
            userErrors { field message }
        }
    }
    "
);

pub const FULFILLMENT_CREATE: &str = r"
    mutation FulfillmentCreate($fulfillment: FulfillmentInput!) {
        fulfillmentCreate(fulfillment: $fulfillment) {
            fulfillment {
                id
                status
                createdAt
                trackingInfo { company number url }
            }
            userErrors { field message }
        }
    }
";

pub const FULFILLMENT_CANCEL: &str = r"
    mutation FulfillmentCancel($id: ID!) {
        fulfillmentCancel(id: $id) {
            fulfillment { id status }
            userErrors { field message }
        }
    }
";

pub const ORDER_MARK_AS_PAID: &str = r"
    mutation OrderMarkAsPaid($input: OrderMarkAsPaidInput!) {
        orderMarkAsPaid(input: $input) {
            order {
                id
                displayFinancialStatus
            }
            userErrors { field message }
        }
    }
";

pub const PRODUCTS: &str = concat!(
    r"
    query Products($first: Int!, $after: String) {
        products(first: $first, after: $after) {
            edges { node {",
    product_fields!(),
    r"} }
            pageInfo { hasNextPage endCursor }
        }
    }
    "
);

pub const PRODUCT: &str = concat!(
    r"
    query Product($id: ID!) {
        product(id: $id) {",
    product_fields!(),
    r"}
    }
    "
);

pub const ORDER_DETAILS: &str = r"
    query OrderDetails($id: ID!) {
        order(id: $id) {
            id
            name
            email
            createdAt
            displayFinancialStatus
            displayFulfillmentStatus
            currencyCode
            totalPriceSet { shopMoney { amount currencyCode } }
            shippingAddress {
                firstName
                lastName
                company
                address1
                address2
                city
                province
                provinceCode
                country
                countryCodeV2
                zip
                phone
            }
            lineItems(first: 100) {
                edges {
                    node {
                        id
                        title
                        sku
                        quantity
                        variant { id }
                        product { id }
                        originalUnitPriceSet { shopMoney { amount } }
                    }
                }
            }
        }
    }
";

pub const WEBHOOK_SUBSCRIPTION_CREATE: &str = r"
    mutation WebhookSubscriptionCreate($topic: WebhookSubscriptionTopic!, $webhookSubscription: WebhookSubscriptionInput!) {
        webhookSubscriptionCreate(topic: $topic, webhookSubscription: $webhookSubscription) {
            webhookSubscription { id topic }
            userErrors { field message }
        }
    }
";

pub const WEBHOOK_SUBSCRIPTIONS: &str = r"
    query WebhookSubscriptions {
        webhookSubscriptions(first: 100) {
            edges {
                node {
                    id
                    topic
                    format
                    endpoint {
                        __typename
                        ... on WebhookHttpEndpoint { callbackUrl }
                    }
                }
            }
        }
    }
";
