pub mod api {
    include!("gen/api.rs");
}

pub mod product {
    include!("gen/product.rs");
}
